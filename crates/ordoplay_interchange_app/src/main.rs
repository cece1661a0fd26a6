// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` graph interchange tool
//!
//! Exports node groups and binding overrides from a RON scene file to a JSON
//! document, and applies such documents back onto a scene.
//!
//! Log output is controlled with `RUST_LOG`.

mod cli;
mod commands;
mod error;

use cli::Invocation;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in [
        "ordoplay_interchange_app=info",
        "ordoplay_interchange_graph=info",
        "ordoplay_interchange_overrides=info",
    ] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let invocation = match Invocation::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };
    if let Err(e) = commands::run(invocation) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
