//! Deferred subcommand registry.
//!
//! Independent parts of the program register subcommands without a central
//! list. Registration only stores a builder; the command itself is produced
//! later, when the runner calls [`Registry::realize_all`] after the shared
//! configuration exists.
//!
//! # Concurrency
//!
//! Appends are guarded by a mutex and may come from any thread. Realization
//! takes the entries out under the lock and then runs the builders without
//! holding it.
//!
//! # Nested registration
//!
//! Registering while realization is in progress is rejected: the entry is
//! dropped, logged, and `realize_all` fails with
//! [`Error::NestedRegistration`]. Registrations after realization are
//! dropped with a warning.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lfs_core::{Error, Result};

use crate::command::{BuildContext, CommandSpec, Invocation};

/// Produces a command, or `None` to skip it.
pub type BuildFn = Box<dyn FnOnce(&BuildContext) -> Option<CommandSpec> + Send>;

/// Customises a freshly built command.
pub type DecorateFn = Box<dyn FnOnce(CommandSpec) -> CommandSpec + Send>;

/// A registered, not yet realized, command.
pub struct BuilderEntry {
    build: BuildFn,
    decorate: Option<DecorateFn>,
}

impl BuilderEntry {
    /// Run the builder, then the decorator on whatever it produced.
    fn realize(self, ctx: &BuildContext) -> Option<CommandSpec> {
        let spec = (self.build)(ctx)?;
        Some(match self.decorate {
            Some(decorate) => decorate(spec),
            None => spec,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Realizing,
    Realized,
}

struct Inner {
    entries: Vec<BuilderEntry>,
    phase: Phase,
    nested: usize,
}

/// Append-only list of deferred command builders.
///
/// Share it with `Arc<Registry>`; hand it to the runner when assembling the
/// root command.
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: Vec::new(),
                phase: Phase::Open,
                nested: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subcommand with the default pre-run hook.
    pub fn register<F>(&self, name: impl Into<String>, run: F)
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        self.register_builder(Box::new(move |ctx| Some(ctx.command(name, run))), None);
    }

    /// Register a subcommand and a callback that customises it once built
    /// (flags, help text, hooks).
    pub fn register_with<F, D>(&self, name: impl Into<String>, run: F, customize: D)
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
        D: FnOnce(CommandSpec) -> CommandSpec + Send + 'static,
    {
        let name = name.into();
        self.register_builder(
            Box::new(move |ctx| Some(ctx.command(name, run))),
            Some(Box::new(customize)),
        );
    }

    /// Register a raw builder. A builder returning `None` is skipped at
    /// realization, which is how optional commands opt out.
    pub fn register_builder(&self, build: BuildFn, decorate: Option<DecorateFn>) {
        let mut inner = self.lock();
        let phase = inner.phase;
        match phase {
            Phase::Open => inner.entries.push(BuilderEntry { build, decorate }),
            Phase::Realizing => {
                inner.nested += 1;
                tracing::error!("command registered during realization; ignoring it");
            }
            Phase::Realized => {
                tracing::warn!("command registered after realization; ignoring it");
            }
        }
    }

    /// Number of builders waiting to be realized.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every builder once, in registration order.
    ///
    /// Returns the commands that were not skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyRealized`] on a second call
    /// - [`Error::NestedRegistration`] if a builder registered more commands
    pub fn realize_all(&self, ctx: &BuildContext) -> Result<Vec<CommandSpec>> {
        let entries = {
            let mut inner = self.lock();
            if inner.phase != Phase::Open {
                return Err(Error::AlreadyRealized);
            }
            inner.phase = Phase::Realizing;
            std::mem::take(&mut inner.entries)
        };

        let total = entries.len();
        let mut specs = Vec::with_capacity(total);
        for entry in entries {
            match entry.realize(ctx) {
                Some(spec) => {
                    tracing::trace!(command = spec.name(), "realized command");
                    specs.push(spec);
                }
                None => tracing::trace!("builder skipped"),
            }
        }

        let mut inner = self.lock();
        inner.phase = Phase::Realized;
        if inner.nested > 0 {
            return Err(Error::NestedRegistration {
                count: inner.nested,
            });
        }
        tracing::debug!(total, realized = specs.len(), "command registry realized");
        Ok(specs)
    }
}

// ============================================================================
// Tests
// ============================================================================
