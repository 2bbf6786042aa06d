use std::sync::Arc;

use lfs_cli::{LfsCli, Registry, StatsClient, commands};

fn main() {
    let name = "git-lfs";
    let version = env!("CARGO_PKG_VERSION");

    let registry = Arc::new(Registry::new());
    commands::register_builtin(&registry, name, version);

    let code = LfsCli::new(name, registry, Arc::new(StatsClient::new()))
        .with_version(version)
        .run(std::env::args_os());
    std::process::exit(code);
}
