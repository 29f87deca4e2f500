//! Variable definitions (spec.md §3 "Variable", §4.3 "var_def").

use crate::ast::expr::Expression;
use crate::ast::modifiers::AccessModifier;
use crate::ast::ty::TypeExpression;
use crate::ident::AbsoluteIdentifier;
use crate::source::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// `ident [: ty] = expr`, and the template-without-value form
    /// `ident [: ty]` (value is `None`).
    UserDefinedVariable {
        type_expr: Option<TypeExpression>,
        value: Option<Expression>,
    },
    /// `extern ident : ty = extern_name`.
    ExternalVariable {
        type_expr: TypeExpression,
        extern_name: String,
    },
    /// Supplemented alias form: `ident = .some.target` with no
    /// initializer expression of its own, just a rename.
    AliasVariable {
        type_expr: Option<TypeExpression>,
        target_ident: AbsoluteIdentifier,
    },
}

/// A top-level or module-scoped variable binding (spec.md §3, §6
/// "Definition position semantics": `pos` is the defined identifier's
/// position, never the modifier's).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub ident: String,
    pub pos: Position,
    pub access: AccessModifier,
    pub is_template: bool,
    pub inst_type_params: Option<Vec<TypeExpression>>,
    pub variable: Variable,
}
