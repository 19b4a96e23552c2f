//! Surface syntax tree.
//!
//! One node per construct as written, sugar included. The tree is owned:
//! the parser builds it and the desugarer consumes it by value.

use crate::{BinaryOp, Loc, Name, UnaryOp, Visibility};

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Loc,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Loc) -> Self {
        Expr { kind, loc }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Null,
    True,
    False,
    SelfRef,
    /// `$`, the outermost enclosing object.
    Dollar,
    Number(f64),
    Str(String),
    Var(Name),

    Array(Vec<Expr>),
    /// `[body for x in a if c ...]`
    ArrayComp {
        body: Box<Expr>,
        specs: Vec<CompSpec>,
    },
    Object(Vec<Member>),
    /// `{ local ..., [key]: value, local ..., for x in a ... }`
    ObjectComp {
        locals: Vec<Bind>,
        key: Box<Expr>,
        plus: bool,
        value: Box<Expr>,
        specs: Vec<CompSpec>,
    },

    Local {
        binds: Vec<Bind>,
        body: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Function {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    Apply {
        target: Box<Expr>,
        args: Vec<Arg>,
        tailstrict: bool,
    },
    /// `target { ... }`
    ApplyBrace {
        target: Box<Expr>,
        object: Box<Expr>,
    },
    /// `target[index]` and `target.field`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target[start:end:step]`
    Slice {
        target: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    /// `super.field` and `super[index]`
    SuperIndex(Box<Expr>),
    /// `field in super`
    InSuper(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assert {
        assert: Box<Assert>,
        body: Box<Expr>,
    },
    Error(Box<Expr>),
    Import(String),
    ImportStr(String),
    ImportBin(String),
}

/// A `local` binding, optionally in function form `f(x) = ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub name: Name,
    pub params: Option<Vec<Param>>,
    pub body: Expr,
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub default: Option<Expr>,
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub name: Option<Name>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompSpec {
    For { var: Name, array: Expr },
    If(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assert {
    pub cond: Expr,
    pub message: Option<Expr>,
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    Local(Bind),
    Assert(Assert),
    Field(Field),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldName {
    Ident(Name),
    Str(String),
    Computed(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: FieldName,
    pub plus: bool,
    pub visibility: Visibility,
    /// Method sugar `f(x): body`.
    pub params: Option<Vec<Param>>,
    pub body: Expr,
    pub loc: Loc,
}
