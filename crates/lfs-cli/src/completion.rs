//! Shell completion scripts.
//!
//! Scripts come from `clap_complete`'s native generators. Bash output gets a
//! trailer so git's own completion (`git lfs <TAB>`) finds the `_git_lfs`
//! function. Zsh output gets its dispatch line rewritten to strip a `git-`
//! prefix.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use clap::Command;
use lfs_core::{Error, Result};

/// Subcommand dispatch assignment in generated zsh scripts.
///
/// In `clap_complete` output `$line[1]` is already the subcommand word, which
/// never starts with `git-`, so the rewrite changes the text but not what the
/// script does.
pub const ZSH_DISPATCH_PATTERN: &str = r#"words=($line[1] "#;

/// Replacement for [`ZSH_DISPATCH_PATTERN`] that strips a leading `git-`.
pub const ZSH_DISPATCH_REWRITE: &str = r#"words=(${line[1]#git-} "#;

/// Shells we can generate completion scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl Shell {
    /// All supported shells, in the order they are documented.
    pub const ALL: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

    /// Names accepted on the command line.
    pub fn names() -> [&'static str; 4] {
        Shell::ALL.map(Shell::as_str)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        }
    }

    fn generator(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Shell::ALL
            .into_iter()
            .find(|shell| shell.as_str() == s)
            .ok_or_else(|| Error::UnsupportedShell(s.to_string()))
    }
}

/// Line appended to bash scripts so git's completion finds `_git_lfs`.
pub fn bash_trailer(bin_name: &str) -> String {
    format!(
        "_{alias}() {{ _{bin_name} \"$@\"; }}\n",
        alias = bin_name.replace('-', "_")
    )
}

/// Replace the first [`ZSH_DISPATCH_PATTERN`] in `script`, if any.
pub fn rewrite_zsh(script: &str) -> String {
    script.replacen(ZSH_DISPATCH_PATTERN, ZSH_DISPATCH_REWRITE, 1)
}

/// Render the completion script for `shell` and write it to `out`.
///
/// The whole script is rendered before anything is written.
pub fn generate(
    shell: Shell,
    root: &mut Command,
    bin_name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let mut buf = Vec::new();
    clap_complete::generate(shell.generator(), root, bin_name, &mut buf);

    let script = match shell {
        Shell::Bash => {
            let mut script = String::from_utf8_lossy(&buf).into_owned();
            script.push_str(&bash_trailer(bin_name));
            script.into_bytes()
        }
        Shell::Zsh => rewrite_zsh(&String::from_utf8_lossy(&buf)).into_bytes(),
        Shell::Fish | Shell::PowerShell => buf,
    };

    out.write_all(&script)?;
    out.flush()?;
    tracing::debug!(%shell, bytes = script.len(), "completion script written");
    Ok(())
}

/// Validate `shell_name`, then generate. Nothing is written for an
/// unsupported shell.
pub fn generate_named(
    shell_name: &str,
    root: &mut Command,
    bin_name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let shell: Shell = shell_name.parse()?;
    generate(shell, root, bin_name, out)
}

/// Long description of the `completion` command.
pub fn long_help(bin_name: &str) -> String {
    format!(
        r#"To load completions:

Bash:

  $ source <({bin_name} completion bash)

  # To load completions for each session, execute once:
  # Linux:
  $ {bin_name} completion bash > /etc/bash_completion.d/{bin_name}
  # macOS:
  $ {bin_name} completion bash > $(brew --prefix)/etc/bash_completion.d/{bin_name}

Zsh:

  # If shell completion is not already enabled in your environment,
  # you will need to enable it.  You can execute the following once:

  $ echo "autoload -U compinit; compinit" >> ~/.zshrc

  # To load completions for each session, execute once:
  $ {bin_name} completion zsh > "${{fpath[1]}}/_{bin_name}"

  # You will need to start a new shell for this setup to take effect.

fish:

  $ {bin_name} completion fish | source

  # To load completions for each session, execute once:
  $ {bin_name} completion fish > ~/.config/fish/completions/{bin_name}.fish

PowerShell:

  PS> {bin_name} completion powershell | Out-String | Invoke-Expression

  # To load completions for every new session, run:
  PS> {bin_name} completion powershell > {bin_name}.ps1
  # and source this file from your PowerShell profile.
"#
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn tree() -> Command {
        Command::new("git-lfs")
            .disable_help_subcommand(true)
            .arg(
                Arg::new("version")
                    .short('v')
                    .long("version")
                    .action(clap::ArgAction::SetTrue),
            )
            .subcommand(Command::new("push").about("Push local objects"))
            .subcommand(Command::new("pull").about("Fetch and checkout objects"))
    }

    fn render(shell: Shell) -> String {
        let mut out = Vec::new();
        generate(shell, &mut tree(), "git-lfs", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_shell_from_str() {
        assert_eq!("bash".parse::<Shell>().unwrap(), Shell::Bash);
        assert_eq!("zsh".parse::<Shell>().unwrap(), Shell::Zsh);
        assert_eq!("fish".parse::<Shell>().unwrap(), Shell::Fish);
        assert_eq!("powershell".parse::<Shell>().unwrap(), Shell::PowerShell);
    }

    #[test]
    fn test_shell_from_str_rejects_unknown() {
        let err = "cobol".parse::<Shell>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedShell(s) if s == "cobol"));
        assert!("Bash".parse::<Shell>().is_err());
    }

    #[test]
    fn test_bash_trailer() {
        assert_eq!(bash_trailer("git-lfs"), "_git_lfs() { _git-lfs \"$@\"; }\n");
    }

    #[test]
    fn test_bash_ends_with_trailer() {
        let script = render(Shell::Bash);
        assert!(script.ends_with(&bash_trailer("git-lfs")));
        assert!(script.contains("push"));
    }

    #[test]
    fn test_rewrite_zsh_first_occurrence_only() {
        let input = format!("a {ZSH_DISPATCH_PATTERN}x\nb {ZSH_DISPATCH_PATTERN}y\n");
        let output = rewrite_zsh(&input);
        assert_eq!(
            output,
            format!("a {ZSH_DISPATCH_REWRITE}x\nb {ZSH_DISPATCH_PATTERN}y\n")
        );
    }

    #[test]
    fn test_zsh_dispatch_rewritten() {
        let mut raw = Vec::new();
        clap_complete::generate(clap_complete::Shell::Zsh, &mut tree(), "git-lfs", &mut raw);
        let raw = String::from_utf8(raw).unwrap();
        assert!(raw.contains(ZSH_DISPATCH_PATTERN));

        let script = render(Shell::Zsh);
        assert!(script.contains(ZSH_DISPATCH_REWRITE));
        assert!(!script.contains(ZSH_DISPATCH_PATTERN));
        // The dispatch still switches on the subcommand word.
        assert!(script.contains("case $line[1] in"));
    }

    #[test]
    fn test_fish_includes_descriptions() {
        let script = render(Shell::Fish);
        assert!(script.contains("Push local objects"));
    }

    #[test]
    fn test_powershell_includes_descriptions() {
        let script = render(Shell::PowerShell);
        assert!(script.contains("Push local objects"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        for shell in Shell::ALL {
            assert_eq!(render(shell), render(shell), "{shell}");
        }
    }

    #[test]
    fn test_generate_named_unsupported_writes_nothing() {
        let mut out = Vec::new();
        let err = generate_named("cobol", &mut tree(), "git-lfs", &mut out).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShell(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_generate_named_matches_generate() {
        for shell in Shell::ALL {
            let mut out = Vec::new();
            generate_named(shell.as_str(), &mut tree(), "git-lfs", &mut out).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), render(shell), "{shell}");
        }
    }

    #[test]
    fn test_names_parse_back() {
        for name in Shell::names() {
            assert_eq!(name.parse::<Shell>().unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_long_help_mentions_every_shell() {
        let text = long_help("git-lfs");
        assert!(text.contains("git-lfs completion bash"));
        assert!(text.contains("\"${fpath[1]}/_git-lfs\""));
        assert!(text.contains("git-lfs completion fish"));
        assert!(text.contains("git-lfs completion powershell"));
    }
}
