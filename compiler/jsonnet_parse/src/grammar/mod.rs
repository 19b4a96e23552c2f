//! Grammar productions.
//!
//! - `expr`: operators, postfix forms and terminals
//! - `object`: object literals and object comprehensions
//! - `binding`: `local` binds, parameter lists, call arguments, `for`/`if`
//!   comprehension clauses and `assert`

mod binding;
mod expr;
mod object;
