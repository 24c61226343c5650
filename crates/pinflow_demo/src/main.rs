// SPDX-License-Identifier: MIT OR Apache-2.0
//! `pinflow` demo host.
//!
//! Wires a small patch, pushes a few values through it and prints what the
//! monitor node receives. An optional first argument names a RON file with
//! a `GraphConfig`; `pinflow.ron` next to this crate's manifest is a sample:
//!
//! ```text
//! cargo run -p pinflow_demo -- crates/pinflow_demo/pinflow.ron
//! ```

mod patch;

use patch::{Patch, PatchError};
use pinflow_graph::{GraphConfig, PinRef};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn run(config_path: Option<PathBuf>) -> Result<(), PatchError> {
    let config = match config_path {
        Some(path) => GraphConfig::load(&path)?,
        None => GraphConfig::default(),
    };

    let mut patch = Patch::build(config, 2.0)?;
    patch.graph.report();

    for value in [1.0, 2.5, -4.0] {
        patch.send(value)?;
    }

    let (post, pre) = patch.orders()?;
    tracing::info!("dfs: {}", post.join(" -> "));
    tracing::info!("bfs: {}", pre.join(" -> "));

    let mut levels = Vec::new();
    patch
        .graph
        .level_order(patch.source, |n| levels.push(n.name().to_string()))?;
    tracing::info!("level order: {}", levels.join(" -> "));

    let feeds = patch.graph.pin_sources(PinRef::input(patch.monitor, 1));
    tracing::info!("monitor input 1 is fed by {} edge(s)", feeds.len());

    patch.graph.remove_node(patch.scale)?;
    patch.send("direct")?;
    patch.graph.report();

    for line in patch.sink.lines() {
        println!("{line}");
    }
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pinflow_graph=debug,pinflow_demo=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pinflow demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args_os().nth(1).map(PathBuf::from)) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
