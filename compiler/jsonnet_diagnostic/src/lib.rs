//! Diagnostics infrastructure for the Jsonnet pipeline.
//!
//! - [`ErrorCode`]: stable codes for every error the pipeline can raise
//! - [`LineOffsetTable`]: byte offset to line/column conversion
//! - [`SourceMap`]: registry of every file a VM has loaded
//! - [`TraceFrame`], [`render_trace`]: runtime stack traces

mod error_code;
mod source_map;
mod trace;

pub use error_code::ErrorCode;
pub use source_map::{LineOffsetTable, SourceMap};
pub use trace::{render_trace, TraceFrame};
