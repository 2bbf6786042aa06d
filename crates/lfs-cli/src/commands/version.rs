//! `version`: report the version number.

use clap::{Arg, ArgAction};

use crate::command::CommandSpec;
use crate::registry::Registry;

const COMICS_ID: &str = "comics";

/// Version line printed by `version` and by the bare root command.
pub fn user_agent(name: &str, version: &str) -> String {
    format!(
        "{name}/{version} ({} {}; rust)",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Register `version`. It needs no local storage, so it runs without the
/// diagnostics hook.
pub fn register(registry: &Registry, name: &str, version: &str) {
    let line = user_agent(name, version);
    registry.register_with(
        "version",
        move |inv| {
            writeln!(inv.out, "{line}")?;
            if inv.matches.get_flag(COMICS_ID) {
                writeln!(inv.out, "Nothing may see Gah Lak Tus and survive!")?;
            }
            Ok(())
        },
        |spec: CommandSpec| {
            spec.about("Report the version number")
                .arg(
                    Arg::new(COMICS_ID)
                        .short('c')
                        .long("comics")
                        .action(ArgAction::SetTrue)
                        .hide(true),
                )
                .without_pre_run()
        },
    );
}

// ============================================================================
// Tests
// ============================================================================
