//! Tracing initialization for the `kiln` binary.
//!
//! Enable with `KILN_LOG=kiln_metadata=debug` (or `RUST_LOG`). Setting
//! `KILN_LOG_TREE=1` switches to indented span trees, which make nested
//! planning sessions easier to follow.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    TRACING_INIT.call_once(|| {
        // Only initialize if a filter is set
        if std::env::var_os("KILN_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let filter =
            EnvFilter::try_from_env("KILN_LOG").unwrap_or_else(|_| EnvFilter::from_default_env());

        if std::env::var_os("KILN_LOG_TREE").is_some_and(|v| v == "1") {
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
