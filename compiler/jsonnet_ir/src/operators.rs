//! Operator and visibility tags.

use std::fmt;

/// Binary operators, including the ones the desugarer rewrites into
/// library calls (`==`, `!=`, `%`, `in`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    /// Binding strength; lower binds tighter. Unary operators sit at 4.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 5,
            BinaryOp::Add | BinaryOp::Sub => 6,
            BinaryOp::Shl | BinaryOp::Shr => 7,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::In => 8,
            BinaryOp::Eq | BinaryOp::Ne => 9,
            BinaryOp::BitAnd => 10,
            BinaryOp::BitXor => 11,
            BinaryOp::BitOr => 12,
            BinaryOp::And => 13,
            BinaryOp::Or => 14,
        }
    }

    /// Loosest binary precedence.
    pub const MAX_PRECEDENCE: u8 = 14;

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Field visibility as written: `:`, `::` or `:::`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    /// `:` keeps whatever the overridden field had, visible by default.
    #[default]
    Inherit,
    /// `::` hides the field from manifestation.
    Hidden,
    /// `:::` forces the field visible even over a hidden base field.
    Forced,
}

impl Visibility {
    pub fn as_symbol(self) -> &'static str {
        match self {
            Visibility::Inherit => ":",
            Visibility::Hidden => "::",
            Visibility::Forced => ":::",
        }
    }
}
