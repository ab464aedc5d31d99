//! Tracing bootstrap.
//!
//! The reconciler emits `debug` events for root-level decisions and `trace` events for every
//! mount, receive, unmount and applied display operation. [`init`] wires them to stderr.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatting subscriber filtered by `RUST_LOG` (default `info`). Idempotent.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init`], with a custom directive used when `RUST_LOG` is unset or invalid.
pub fn init_with_default(directive: &str) {
    TRACING_INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        let result = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();

        if result.is_err() {
            eprintln!("stack-reconciler: a global tracing subscriber is already installed");
        } else {
            tracing::debug!(directive, "tracing initialised");
        }
    });
}
