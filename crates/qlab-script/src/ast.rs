//! Abstract syntax tree for QLab scripts.

use serde::{Deserialize, Serialize};

/// A complete script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Binding introduction: `let name = expr;`
    Let { name: String, value: Expr },

    /// Rebinding of an existing name: `name = expr;`
    Assign { name: String, value: Expr },

    /// Expression evaluated for its effect: `c.h(0);`
    Expr(Expr),

    /// Conditional.
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },

    /// Half-open integer range loop: `for i in a..b { ... }`
    For {
        variable: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal (integers are widened to f64).
    Number(f64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// The constant π.
    Pi,
    /// Variable reference.
    Ident(String),
    /// Array literal: `[a, b, c]`
    Array(Vec<Expr>),
    /// Indexing: `a[i]`
    Index { target: Box<Expr>, index: Box<Expr> },
    /// Unary operation.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary operation.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Free function call: `f(args)` — resolved against the binding set.
    Call { name: String, args: Vec<Expr> },
    /// Method call: `recv.m(args)` — dispatched on the receiver's type.
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}
