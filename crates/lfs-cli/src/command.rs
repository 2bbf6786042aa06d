//! Command nodes and the context they run in.
//!
//! A [`CommandSpec`] is one subcommand: its name, help strings, extra flags,
//! run function, and optional pre-run hook. Specs are produced by deferred
//! builders (see [`crate::registry`]) once a [`BuildContext`] exists, and are
//! converted into `clap` subcommands when the tree is assembled.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use lfs_core::Result;

use crate::config::LfsConfig;

/// Id of the catch-all positional argument every subcommand accepts.
pub const ARGS_ID: &str = "args";

/// A subcommand body.
pub type RunFn = Arc<dyn Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync>;

/// Callback that runs immediately before a command's body. Hooks cannot fail.
pub type PreRunHook = Arc<dyn Fn(&mut Invocation<'_>) + Send + Sync>;

// ============================================================================
// Invocation
// ============================================================================

/// Everything a run function or hook receives.
pub struct Invocation<'a> {
    /// Name of the matched command.
    pub name: &'a str,
    /// Parsed arguments for the matched command.
    pub matches: &'a ArgMatches,
    /// Positional arguments, in order.
    pub args: Vec<String>,
    /// Shared configuration.
    pub config: &'a LfsConfig,
    /// Standard output.
    pub out: &'a mut dyn Write,
    /// Error stream.
    pub err: &'a mut dyn Write,
}

impl<'a> Invocation<'a> {
    /// Build an invocation for `name` from its matches.
    pub fn new(
        name: &'a str,
        matches: &'a ArgMatches,
        config: &'a LfsConfig,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
    ) -> Self {
        let args = matches
            .try_get_many::<String>(ARGS_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Self {
            name,
            matches,
            args,
            config,
            out,
            err,
        }
    }
}

// ============================================================================
// CommandSpec
// ============================================================================

/// One subcommand of the tool.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    short_help: String,
    long_help: String,
    args: Vec<Arg>,
    run: RunFn,
    pre_run: Option<PreRunHook>,
}

impl CommandSpec {
    /// Create a command with no pre-run hook.
    ///
    /// Most callers want [`BuildContext::command`], which attaches the
    /// default hook.
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            short_help: String::new(),
            long_help: String::new(),
            args: Vec::new(),
            run: Arc::new(run),
            pre_run: None,
        }
    }

    /// Set the one-line description.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.short_help = text.into();
        self
    }

    /// Set the long description.
    pub fn long_about(mut self, text: impl Into<String>) -> Self {
        self.long_help = text.into();
        self
    }

    /// Add a flag. The id [`ARGS_ID`] is reserved.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Replace the pre-run hook.
    pub fn with_pre_run(mut self, hook: PreRunHook) -> Self {
        self.pre_run = Some(hook);
        self
    }

    /// Remove the pre-run hook.
    pub fn without_pre_run(mut self) -> Self {
        self.pre_run = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_help(&self) -> &str {
        &self.short_help
    }

    pub fn long_help(&self) -> &str {
        &self.long_help
    }

    pub fn has_pre_run(&self) -> bool {
        self.pre_run.is_some()
    }

    /// Run the pre-run hook (if any), then the body.
    pub fn execute(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        if let Some(hook) = &self.pre_run {
            hook(&mut *invocation);
        }
        (self.run)(invocation)
    }

    /// Convert into a `clap` subcommand.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone())
            .disable_help_flag(true)
            .args(self.args.iter().cloned())
            .arg(Arg::new(ARGS_ID).num_args(0..).hide(true));
        if !self.short_help.is_empty() {
            cmd = cmd.about(self.short_help.clone());
        }
        if !self.long_help.is_empty() {
            cmd = cmd.long_about(self.long_help.clone());
        }
        cmd
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("short_help", &self.short_help)
            .field("args", &self.args.len())
            .field("pre_run", &self.pre_run.is_some())
            .finish()
    }
}

// ============================================================================
// BuildContext
// ============================================================================

/// What deferred builders receive when the registry is realized.
///
/// It only exists once the shared configuration has been constructed, which
/// is why builders are deferred at all.
#[derive(Clone)]
pub struct BuildContext {
    config: Arc<LfsConfig>,
    pre_run: Option<PreRunHook>,
}

impl BuildContext {
    /// Create a context around the shared configuration.
    pub fn new(config: Arc<LfsConfig>) -> Self {
        Self {
            config,
            pre_run: None,
        }
    }

    /// Set the hook attached to every command built through [`Self::command`].
    pub fn with_pre_run(mut self, hook: PreRunHook) -> Self {
        self.pre_run = Some(hook);
        self
    }

    pub fn config(&self) -> &Arc<LfsConfig> {
        &self.config
    }

    /// Create a command carrying the default pre-run hook.
    pub fn command<F>(&self, name: impl Into<String>, run: F) -> CommandSpec
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let spec = CommandSpec::new(name, run);
        match &self.pre_run {
            Some(hook) => spec.with_pre_run(Arc::clone(hook)),
            None => spec,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
