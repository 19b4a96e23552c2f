//! One-shot memoised computations.
//!
//! ```text
//! Pending ──force──▶ Evaluating ──▶ Done(value)
//!                        │      └──▶ Failed(error)
//!                        └── force again: infinite recursion
//! ```

use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::heap::{EnvId, ObjectId};
use crate::value::{Ctx, FuncValue, Value};
use jsonnet_ir::CoreId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Work a pending thunk will do when forced.
pub(crate) enum Suspended {
    Expr { expr: CoreId, env: EnvId, ctx: Ctx },
    /// Field `name` of `object`, defined in leaf `leaf`.
    Field { object: ObjectId, leaf: u32, name: Rc<str> },
    /// Deferred application, used by `std.map` and `std.makeArray`.
    Call { func: Rc<FuncValue>, args: Vec<Thunk> },
}

enum State {
    Pending(Suspended),
    Evaluating,
    Done(Value),
    Failed(EvalError),
}

/// Outcome of starting to force a thunk.
pub(crate) enum Begin {
    Ready(EvalResult<Value>),
    Run(Suspended),
}

#[derive(Clone)]
pub struct Thunk(Rc<RefCell<State>>);

impl Thunk {
    fn with_state(state: State) -> Self {
        Thunk(Rc::new(RefCell::new(state)))
    }

    pub fn done(value: Value) -> Self {
        Thunk::with_state(State::Done(value))
    }

    pub(crate) fn expr(expr: CoreId, env: EnvId, ctx: Ctx) -> Self {
        Thunk::with_state(State::Pending(Suspended::Expr { expr, env, ctx }))
    }

    pub(crate) fn field(object: ObjectId, leaf: u32, name: Rc<str>) -> Self {
        Thunk::with_state(State::Pending(Suspended::Field { object, leaf, name }))
    }

    pub(crate) fn call(func: Rc<FuncValue>, args: Vec<Thunk>) -> Self {
        Thunk::with_state(State::Pending(Suspended::Call { func, args }))
    }

    /// Placeholder filled in later with [`Thunk::set`].
    pub(crate) fn placeholder() -> Self {
        Thunk::with_state(State::Done(Value::Null))
    }

    pub(crate) fn set(&self, value: Value) {
        *self.0.borrow_mut() = State::Done(value);
    }

    /// Move to `Evaluating` and hand out the suspended work, or return the
    /// memoised outcome.
    pub(crate) fn begin(&self) -> Begin {
        let mut state = self.0.borrow_mut();
        if matches!(*state, State::Pending(_)) {
            if let State::Pending(work) = std::mem::replace(&mut *state, State::Evaluating) {
                return Begin::Run(work);
            }
        }
        match &*state {
            State::Done(value) => Begin::Ready(Ok(value.clone())),
            State::Failed(err) => Begin::Ready(Err(err.clone())),
            State::Evaluating | State::Pending(_) => {
                Begin::Ready(Err(EvalError::new(EvalErrorKind::InfiniteRecursion)))
            }
        }
    }

    pub(crate) fn finish(&self, result: &EvalResult<Value>) {
        *self.0.borrow_mut() = match result {
            Ok(value) => State::Done(value.clone()),
            Err(err) => State::Failed(err.clone()),
        };
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(*self.0.borrow(), State::Done(_))
    }

    pub fn ptr_eq(&self, other: &Thunk) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &*self.0.borrow() {
            State::Pending(_) => "pending",
            State::Evaluating => "evaluating",
            State::Done(_) => "done",
            State::Failed(_) => "failed",
        };
        write!(f, "Thunk({label})")
    }
}
