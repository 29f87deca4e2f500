//! Expressions (spec.md §3 "Expression", §4.3 "Operator handling").

use crate::ast::literal::LiteralValue;
use crate::ast::modifiers::FunctionModifier;
use crate::ast::ty::TypeExpression;
use crate::ident::Identifier;
use crate::source::Position;

/// A formal parameter of a function head (spec.md §3 "Argument").
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub position: usize,
    pub ident: String,
    pub type_expr: Option<TypeExpression>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(LiteralValue, Position),
    VariableExpression(Identifier, Position),
    /// `fun(args...)` or `lhs OP rhs` desugared into application — the
    /// ordinary, freely-copyable call form.
    NonUniqueApplication {
        modifier: FunctionModifier,
        fun: Box<Expression>,
        args: Vec<Expression>,
        pos: Position,
    },
    /// Same shape as `NonUniqueApplication` but calling into a unique
    /// (affine) constructor or function — kept as a distinct variant
    /// rather than a flag so pattern matches stay exhaustive per call
    /// kind (spec.md §3).
    UniqueApplication {
        modifier: FunctionModifier,
        fun: Box<Expression>,
        args: Vec<Expression>,
        pos: Position,
    },
    ConstructorValue {
        constr_ident: Identifier,
        args: Vec<Expression>,
        pos: Position,
    },
    /// `let ident [: ty] = value in body` — AST shape only; concrete
    /// surface syntax is not part of the grammar this crate parses
    /// (spec.md §3 lists it as a downstream form; see DESIGN.md).
    Let {
        ident: String,
        type_expr: Option<TypeExpression>,
        value: Box<Expression>,
        body: Box<Expression>,
        pos: Position,
    },
    If {
        cond: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
        pos: Position,
    },
    Lambda {
        args: Vec<Argument>,
        body: Box<Expression>,
        pos: Position,
    },
    Match {
        scrutinee: Box<Expression>,
        arms: Vec<MatchArm>,
        pos: Position,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub constr_ident: Identifier,
    pub bindings: Vec<String>,
    pub body: Expression,
    pub pos: Position,
}

impl Expression {
    pub fn pos(&self) -> &Position {
        match self {
            Expression::Literal(_, pos) => pos,
            Expression::VariableExpression(_, pos) => pos,
            Expression::NonUniqueApplication { pos, .. } => pos,
            Expression::UniqueApplication { pos, .. } => pos,
            Expression::ConstructorValue { pos, .. } => pos,
            Expression::Let { pos, .. } => pos,
            Expression::If { pos, .. } => pos,
            Expression::Lambda { pos, .. } => pos,
            Expression::Match { pos, .. } => pos,
        }
    }
}
