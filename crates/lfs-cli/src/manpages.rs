//! Built-in help pages, keyed by command name.

pub(crate) const BUILTIN: &[(&str, &str)] = &[
    (
        "git-lfs",
        r#"
git-lfs(1) - Work with large files in Git repositories

git lfs <command> [<args>]

Git LFS is a system for managing and versioning large files in association
with a Git repository. Instead of storing the large files within the Git
repository as blobs, Git LFS stores special "pointer files" in the
repository, while storing the actual file contents on a Git LFS server.

Commands:

git lfs completion:
  Shell tab-completion script generation for Git LFS.
git lfs help:
  Show help for a command or topic.
git lfs version:
  Report the version number.

Topics:

git lfs help config:
  Configuration options for Git LFS.
git lfs help faq:
  Frequently asked questions about Git LFS.
"#,
    ),
    (
        "completion",
        r#"
git-lfs-completion(1) - Shell tab-completion script generation for Git LFS

git lfs completion bash
git lfs completion fish
git lfs completion powershell
git lfs completion zsh

Outputs a script which, when executed in a session of the given shell, will
implement command-line tab-completion of Git LFS commands.

Each shell requires a different set of commands to load the completion
script, either for an individual session or automatically whenever a new
session is started. See `git lfs completion --help` in a terminal for
instructions.
"#,
    ),
    (
        "help",
        r#"
git-lfs-help(1) - Show help for a command or topic

git lfs help [<command>|<topic>]

Print the manual page for the given command or topic, or for Git LFS itself
when none is given.
"#,
    ),
    (
        "version",
        r#"
git-lfs-version(1) - Report the version number

git lfs version

Report the version number.
"#,
    ),
    (
        "config",
        r#"
git-lfs-config(5) - Configuration options for git-lfs

Git LFS reads its own configuration file ($XDG_CONFIG_HOME/git-lfs/config.toml,
or the file named by GIT_LFS_CONFIG) and the environment.

[storage]
  path = "<dir>"
    Overrides the local object directory, normally <git-dir>/lfs.

Environment:

GIT_LOG_STATS
  Set to any non-empty value to write HTTP statistics for the run to
  <git-dir>/lfs/logs/http/http-<timestamp>.log.
GIT_LFS_LOG
  Log filter for diagnostic output on standard error.
"#,
    ),
    (
        "faq",
        r#"
git-lfs-faq(7) - FAQ for Git LFS

Where are my HTTP logs?
  Run the command with GIT_LOG_STATS=1. Each run writes one file under
  <git-dir>/lfs/logs/http.

Why does `git lfs <command>` fail with exit code 127?
  Any failure to run a command, including an unknown command name, exits
  with status 127.
"#,
    ),
];
