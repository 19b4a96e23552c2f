//! Embeddable Jsonnet evaluator.
//!
//! ```ignore
//! use jsonnet::{MemoryImporter, Vm};
//!
//! let mut vm = Vm::builder()
//!     .importer(MemoryImporter::new().with_file("lib.libsonnet", "{x: 1}"))
//!     .ext_var("env", "prod")
//!     .build()?;
//! let json = vm.evaluate_snippet(
//!     "main.jsonnet",
//!     "(import 'lib.libsonnet') + {env: std.extVar('env')}",
//! )?;
//! ```
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `RUST_LOG`:
//! - `RUST_LOG=jsonnet_eval=debug` - render, import and bootstrap spans
//! - `RUST_LOG=jsonnet_parse=debug` - front-end stages

mod config;
mod error;
mod importer;
mod vm;

use std::sync::Once;

pub use config::VmConfig;
pub use error::{Error, ErrorKind};
pub use importer::MemoryImporter;
pub use jsonnet_diagnostic::ErrorCode;
pub use jsonnet_eval::{ExtVar, ImportedFile, Importer, NoImporter};
pub use vm::{Vm, VmBuilder};

static TRACING_INIT: Once = Once::new();

/// Install a tree-shaped tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call multiple times. Does nothing when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .try_init();
        }
    });
}
