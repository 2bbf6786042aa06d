//! The git-lfs runner.
//!
//! [`LfsCli`] assembles the command tree from a [`Registry`] and runs one
//! command line to completion, returning the process exit status. The
//! sequence is fixed:
//!
//! 1. install the log subscriber on the runner's error stream
//! 2. build the root with its fixed subcommands and global flags
//! 3. canonicalise the environment snapshot
//! 4. load the shared configuration
//! 5. realize the registry and attach every command
//! 6. parse and dispatch
//! 7. close the API client
//!
//! Any failure in steps 3 to 6 exits with [`EXIT_FAILURE`]; the client is
//! closed exactly once either way.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use clap::ArgMatches;
use clap::error::ErrorKind;
use lfs_core::{ApiClient, Environment, Error, Result, Translator};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::cli::{self, COMPLETION, CommandTree, HELP};
use crate::command::{BuildContext, Invocation};
use crate::commands::version::user_agent;
use crate::completion;
use crate::config::LfsConfig;
use crate::diagnostics::HttpStatsHook;
use crate::help::{
    HELP_ALIAS_TOPICS, HELP_TOKEN, HelpRenderer, HelpResolver, ManPages, UsageRenderer,
};
use crate::registry::Registry;

/// Exit status for a successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status for every kind of failure.
pub const EXIT_FAILURE: i32 = 127;

/// Log filter for diagnostic output. Falls back to `RUST_LOG`.
pub const LOG_ENV: &str = "GIT_LFS_LOG";

type Output = Box<dyn Write + Send>;

// ============================================================================
// Error stream
// ============================================================================

/// The runner's error stream, shared with its log subscriber.
#[derive(Clone)]
struct ErrorStream(Arc<Mutex<Output>>);

impl ErrorStream {
    fn new(inner: Output) -> Self {
        Self(Arc::new(Mutex::new(inner)))
    }
}

impl Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}

impl<'a> MakeWriter<'a> for ErrorStream {
    type Writer = ErrorStream;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ============================================================================
// LfsCli
// ============================================================================

/// The root command runner.
pub struct LfsCli {
    name: String,
    version: String,
    registry: Arc<Registry>,
    client: Arc<dyn ApiClient>,
    help: Arc<dyn HelpRenderer>,
    usage: Arc<dyn UsageRenderer>,
    default_renderers: bool,
    translator: Translator,
    environment: Option<Environment>,
    out: Output,
    err: ErrorStream,
}

impl LfsCli {
    /// Create a runner for the root command `name`.
    ///
    /// Help and usage default to a [`HelpResolver`] over the built-in pages.
    pub fn new(
        name: impl Into<String>,
        registry: Arc<Registry>,
        client: Arc<dyn ApiClient>,
    ) -> Self {
        let name = name.into();
        let resolver = Arc::new(HelpResolver::new(name.clone(), ManPages::builtin()));
        Self {
            name,
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry,
            client,
            help: resolver.clone(),
            usage: resolver,
            default_renderers: true,
            translator: Translator::identity(),
            environment: None,
            out: Box::new(io::stdout()),
            err: ErrorStream::new(Box::new(io::stderr())),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace both renderers.
    pub fn with_renderers(
        mut self,
        help: Arc<dyn HelpRenderer>,
        usage: Arc<dyn UsageRenderer>,
    ) -> Self {
        self.help = help;
        self.usage = usage;
        self.default_renderers = false;
        self
    }

    /// Catalog for user-facing messages.
    ///
    /// Also applies to the default renderers; renderers passed to
    /// [`Self::with_renderers`] keep their own catalog.
    pub fn with_translator(mut self, translator: Translator) -> Self {
        if self.default_renderers {
            let resolver = Arc::new(
                HelpResolver::new(self.name.clone(), ManPages::builtin())
                    .with_translator(translator.clone()),
            );
            self.help = resolver.clone();
            self.usage = resolver;
        }
        self.translator = translator;
        self
    }

    /// Use `environment` instead of the process environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Redirect standard output and the error stream. Log output follows the
    /// error stream.
    pub fn with_output(
        mut self,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        self.out = Box::new(out);
        self.err = ErrorStream::new(Box::new(err));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Run one command line and return the exit status.
    ///
    /// `args` includes the program name, as in `std::env::args_os()`.
    pub fn run<I, T>(mut self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let environment = self
            .environment
            .take()
            .unwrap_or_else(Environment::from_process);
        let _logging = init_logging(&environment, self.err.clone());

        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let result = self.execute(environment, &args);

        if let Err(e) = &result {
            tracing::debug!("command failed: {e}");
            if !matches!(e, Error::Usage(_)) {
                let _ = writeln!(self.err, "Error: {e}");
            }
        }
        self.client.close();
        let _ = self.out.flush();
        let _ = self.err.flush();

        match result {
            Ok(()) => EXIT_SUCCESS,
            Err(_) => EXIT_FAILURE,
        }
    }

    fn execute(&mut self, environment: Environment, args: &[OsString]) -> Result<()> {
        let mut tree = CommandTree::new(&self.name);

        let environment = environment.canonicalize_from_cwd();
        let config = Arc::new(LfsConfig::load(&environment)?);

        let hook = HttpStatsHook::new(&environment, config.clone(), Arc::clone(&self.client))
            .with_translator(self.translator.clone());
        let ctx = BuildContext::new(Arc::clone(&config)).with_pre_run(hook.into_pre_run());
        tree.attach_all(self.registry.realize_all(&ctx)?);

        let matches = match tree.root().clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                let topic = help_flag_topic(args);
                self.help.render_help(&topic, &mut *self.out)?;
                return Ok(());
            }
            Err(e) => {
                write!(self.err, "{}", e.render())?;
                let command = usage_command(&tree, args).unwrap_or(self.name.as_str());
                self.usage.render_usage(command, &mut *self.out)?;
                return Err(Error::usage(e.to_string().trim_end()));
            }
        };

        self.dispatch(&mut tree, &matches, &config)
    }

    fn dispatch(
        &mut self,
        tree: &mut CommandTree,
        matches: &ArgMatches,
        config: &LfsConfig,
    ) -> Result<()> {
        match matches.subcommand() {
            None => {
                writeln!(self.out, "{}", user_agent(&self.name, &self.version))?;
                if !matches.get_flag(cli::VERSION_ID) {
                    self.usage.render_usage(&self.name, &mut *self.out)?;
                }
                Ok(())
            }
            Some((COMPLETION, sub)) => {
                let shell = sub
                    .get_one::<String>(cli::SHELL_ID)
                    .ok_or_else(|| Error::usage("missing shell"))?;
                completion::generate_named(shell, tree.root_mut(), &self.name, &mut *self.out)
            }
            Some((HELP, sub)) => {
                let topics: Vec<String> = sub
                    .get_many::<String>(cli::TOPIC_ID)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                self.help_topics(tree, &topics)
            }
            Some((name, sub)) => {
                let spec = tree
                    .get(name)
                    .ok_or_else(|| Error::not_found(format!("command {name:?}")))?;
                tracing::debug!(command = name, "dispatching");
                let mut invocation =
                    Invocation::new(name, sub, config, &mut *self.out, &mut self.err);
                spec.execute(&mut invocation)
            }
        }
    }

    /// The `help` subcommand. Never fails on an unknown topic.
    fn help_topics(&mut self, tree: &CommandTree, topics: &[String]) -> Result<()> {
        let Some(topic) = topics.first() else {
            self.help.render_help(&self.name, &mut *self.out)?;
            return Ok(());
        };

        if tree.contains(topic) || HELP_ALIAS_TOPICS.contains(&topic.as_str()) {
            self.help.render_help(topic, &mut *self.out)?;
        } else {
            let msg = self
                .translator
                .get("Unknown help topic {}", &[&quote_topics(topics)]);
            writeln!(self.err, "{msg}")?;
            self.usage.render_usage(&self.name, &mut *self.out)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LfsCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfsCli")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("pending", &self.registry.len())
            .finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Topic for a `-h/--help` request: the first argument after the program
/// name, or the root when that argument is itself a flag.
fn help_flag_topic(args: &[OsString]) -> String {
    match args.get(1).map(|a| a.to_string_lossy()) {
        Some(first) if !first.starts_with('-') => first.into_owned(),
        _ => HELP_TOKEN.to_string(),
    }
}

/// Registered or fixed subcommand named on a failing command line, if any.
fn usage_command<'a>(tree: &CommandTree, args: &'a [OsString]) -> Option<&'a str> {
    args.get(1)
        .and_then(|a| a.to_str())
        .filter(|name| tree.contains(name))
}

/// `[`a` `b`]`
fn quote_topics(topics: &[String]) -> String {
    let quoted: Vec<String> = topics.iter().map(|t| format!("`{t}`")).collect();
    format!("[{}]", quoted.join(" "))
}

/// Route log output to `writer` for as long as the returned guard lives.
///
/// The filter comes from `GIT_LFS_LOG`, then `RUST_LOG`, then `warn`. An
/// invalid filter falls back to `warn`.
pub fn init_logging<W>(environment: &Environment, writer: W) -> DefaultGuard
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let directives = [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .find_map(|key| environment.get(key).filter(|v| !v.is_empty()))
        .unwrap_or("warn");
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

// ============================================================================
// Tests
// ============================================================================
