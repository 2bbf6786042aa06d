//! Command tree construction.
//!
//! The root command and its two fixed subcommands (`completion` and `help`)
//! are built with the `clap` builder API; registered subcommands are added
//! from their [`CommandSpec`]s. `clap`'s own help flag, help subcommand and
//! version flag are switched off everywhere so that every help request goes
//! through the injected renderers.

use std::collections::BTreeMap;

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};

use crate::command::CommandSpec;
use crate::completion::{self, Shell};

/// Name of the completion subcommand.
pub const COMPLETION: &str = "completion";

/// Name of the help subcommand.
pub const HELP: &str = "help";

/// Subcommand names owned by the root itself.
pub const RESERVED_NAMES: &[&str] = &[COMPLETION, HELP];

/// Id of the root `-v/--version` flag.
pub const VERSION_ID: &str = "version";

/// Id of the global `-h/--help` flag.
pub const HELP_FLAG_ID: &str = "help";

/// Id of the completion subcommand's shell argument.
pub const SHELL_ID: &str = "shell";

/// Id of the help subcommand's topic arguments.
pub const TOPIC_ID: &str = "topic";

// ============================================================================
// Fixed nodes
// ============================================================================

/// The bare root command, without global flags or subcommands.
pub fn root_command(name: &str) -> Command {
    Command::new(name.to_string())
        .disable_help_flag(true)
        .disable_help_subcommand(true)
        .disable_version_flag(true)
}

/// The `completion <shell>` subcommand.
pub fn completion_command(bin_name: &str) -> Command {
    Command::new(COMPLETION)
        .about("Generate completion script")
        .long_about(completion::long_help(bin_name))
        .disable_help_flag(true)
        .arg(
            Arg::new(SHELL_ID)
                .required(true)
                .value_parser(PossibleValuesParser::new(Shell::names())),
        )
}

/// The `help [topic...]` subcommand.
pub fn help_command(bin_name: &str) -> Command {
    Command::new(HELP)
        .about("Help about any command")
        .long_about(format!(
            "Help provides help for any command in the application.\n\
             Simply type {bin_name} help [path to command] for full details."
        ))
        .disable_help_flag(true)
        .arg(Arg::new(TOPIC_ID).num_args(0..).value_name("COMMAND"))
}

/// Add `-v/--version` to the root and a global `-h/--help`.
pub fn with_global_flags(root: Command) -> Command {
    root.arg(
        Arg::new(VERSION_ID)
            .short('v')
            .long("version")
            .action(ArgAction::SetTrue)
            .help("Print the version"),
    )
    .arg(
        Arg::new(HELP_FLAG_ID)
            .short('h')
            .long("help")
            .action(ArgAction::Help)
            .global(true)
            .help("Show help"),
    )
}

// ============================================================================
// CommandTree
// ============================================================================

/// The assembled root command plus the realized specs, keyed by name.
#[derive(Debug)]
pub struct CommandTree {
    root: Command,
    specs: BTreeMap<String, CommandSpec>,
}

impl CommandTree {
    /// The root with its global flags and fixed subcommands, and nothing
    /// registered yet.
    pub fn new(name: &str) -> Self {
        let root = with_global_flags(root_command(name))
            .subcommand(completion_command(name))
            .subcommand(help_command(name));
        Self {
            root,
            specs: BTreeMap::new(),
        }
    }

    /// Attach realized specs in the order given.
    ///
    /// A spec whose name is already taken (by an earlier spec or a fixed
    /// node) is skipped with a warning.
    pub fn attach_all(&mut self, specs: Vec<CommandSpec>) {
        for spec in specs {
            if RESERVED_NAMES.contains(&spec.name()) {
                tracing::warn!(command = spec.name(), "name is reserved; skipping command");
                continue;
            }
            if self.specs.contains_key(spec.name()) {
                tracing::warn!(command = spec.name(), "duplicate command; keeping the first");
                continue;
            }
            let root = std::mem::take(&mut self.root);
            self.root = root.subcommand(spec.to_command());
            self.specs.insert(spec.name().to_string(), spec);
        }
        tracing::debug!(commands = self.specs.len(), "command tree assembled");
    }

    /// Whether `name` is a subcommand in the tree.
    pub fn contains(&self, name: &str) -> bool {
        RESERVED_NAMES.contains(&name) || self.specs.contains_key(name)
    }

    /// Look up a registered subcommand.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.specs.get(name)
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn spec(name: &str, about: &str) -> CommandSpec {
        CommandSpec::new(name, |_| Ok(())).about(about)
    }

    fn tree_with(specs: Vec<CommandSpec>) -> CommandTree {
        let mut tree = CommandTree::new("git-lfs");
        tree.attach_all(specs);
        tree
    }

    fn tree() -> CommandTree {
        tree_with(vec![spec("push", "Push"), spec("pull", "Pull")])
    }

    #[test]
    fn test_root_version_flag() {
        let m = tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "-v"])
            .unwrap();
        assert!(m.get_flag(VERSION_ID));
        assert!(m.subcommand().is_none());
    }

    #[test]
    fn test_root_debug_assert() {
        tree().root().clone().debug_assert();
    }

    #[test]
    fn test_help_flag_is_intercepted() {
        for argv in [&["git-lfs", "--help"][..], &["git-lfs", "push", "-h"]] {
            let err = tree()
                .root()
                .clone()
                .try_get_matches_from(argv)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "{argv:?}");
        }
    }

    #[test]
    fn test_completion_shell_parsed() {
        let m = tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "completion", "zsh"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, COMPLETION);
        assert_eq!(sub.get_one::<String>(SHELL_ID).map(String::as_str), Some("zsh"));
    }

    #[test]
    fn test_completion_rejects_unknown_shell() {
        let err = tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "completion", "cobol"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_completion_requires_shell() {
        assert!(tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "completion"])
            .is_err());
    }

    #[test]
    fn test_help_topics_collected() {
        let m = tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "help", "push", "extra"])
            .unwrap();
        let (_, sub) = m.subcommand().unwrap();
        let topics: Vec<&String> = sub.get_many::<String>(TOPIC_ID).unwrap().collect();
        assert_eq!(topics, ["push", "extra"]);
    }

    #[test]
    fn test_unknown_subcommand_is_error() {
        assert!(tree()
            .root()
            .clone()
            .try_get_matches_from(["git-lfs", "frobnicate"])
            .is_err());
    }

    #[test]
    fn test_attach_first_registered_wins() {
        let tree = tree_with(vec![spec("push", "first"), spec("push", "second")]);
        assert_eq!(tree.get("push").unwrap().short_help(), "first");
        let pushes = tree.root().get_subcommands().filter(|c| c.get_name() == "push");
        assert_eq!(pushes.count(), 1);
    }

    #[test]
    fn test_attach_all_appends_to_existing_tree() {
        let mut tree = tree_with(vec![spec("push", "Push")]);
        tree.attach_all(vec![spec("push", "again"), spec("prune", "Prune")]);
        assert_eq!(tree.get("push").unwrap().short_help(), "Push");
        assert!(tree.contains("prune"));
        assert_eq!(tree.root().get_subcommands().count(), 4);
    }

    #[test]
    fn test_attach_skips_reserved_names() {
        let tree = tree_with(vec![spec("help", "shadow")]);
        assert!(tree.get("help").is_none());
        assert!(tree.contains("help"));
        assert!(tree.contains("completion"));
        assert_eq!(tree.root().get_subcommands().count(), 2);
    }

    #[test]
    fn test_attach_keeps_descriptions() {
        let tree = tree();
        let push = tree
            .root()
            .get_subcommands()
            .find(|c| c.get_name() == "push")
            .unwrap();
        assert_eq!(push.get_about().map(|s| s.to_string()).as_deref(), Some("Push"));
    }
}
