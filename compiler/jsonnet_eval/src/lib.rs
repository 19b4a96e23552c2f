//! Lazy evaluator for Jsonnet core programs.
//!
//! [`Interpreter`] owns everything a VM needs across renders: the core
//! arena, variable resolutions and source map shared by every program it
//! has compiled, the bootstrapped standard library, and the import and
//! program caches. Runtime values live in a heap arena that is rolled back
//! after every render.
//!
//! # Evaluation model
//!
//! - locals, array elements, call arguments and object fields are
//!   [`Thunk`]s, forced at most once
//! - objects are lists of leaves; `+` concatenates them and field bodies
//!   run with `self` bound to the object they were reached through
//! - every function call and field evaluation counts against the stack
//!   limit, and errors collect a trace frame at each of those boundaries
//!
//! # Standard library
//!
//! The library is part written in the language (`std.jsonnet`) and part
//! native built-ins; both are reachable as fields of `std`.

mod builtins;
mod error;
mod format;
mod heap;
mod importer;
mod interpreter;
mod manifest;
mod object;
mod stdlib;
mod thunk;
mod value;


pub use error::{CompileError, CompileStage, EvalError, EvalErrorKind, EvalResult};
pub use heap::{EnvId, ObjectId};
pub use importer::{ExtVar, ImportedFile, Importer, NoImporter};
pub use interpreter::Interpreter;
pub use thunk::Thunk;
pub use value::{Ctx, FuncValue, NativeCallback, NativeFn, Value};
