//! Intermediate representations shared by every stage of the pipeline.
//!
//! - [`Span`], [`FileId`], [`Loc`]: source locations
//! - [`Name`], [`StringInterner`]: interned identifiers
//! - [`Token`], [`TokenKind`], [`TokenList`]: lexer output
//! - [`ast`]: the surface syntax tree produced by the parser
//! - [`core`]: the desugared core calculus, stored in a [`CoreArena`]
//! - [`BinaryOp`], [`UnaryOp`], [`Visibility`]: operator and field tags

pub mod ast;
pub mod core;
mod interner;
mod name;
mod operators;
mod span;
mod token;

pub use core::{CoreArena, CoreArg, CoreExpr, CoreField, CoreId, CoreKind, CoreParam};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use operators::{BinaryOp, UnaryOp, Visibility};
pub use span::{FileId, Loc, Span};
pub use token::{StrStyle, Token, TokenKind, TokenList};
