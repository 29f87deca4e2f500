//! Function definitions (spec.md §3 "Function", §4.3 "fun_def"/"head").

use crate::ast::expr::{Argument, Expression};
use crate::ast::modifiers::{AccessModifier, Annotation, FunctionModifier, InlineModifier};
use crate::ast::ty::TypeExpression;
use crate::source::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    UserDefinedFunction {
        args: Vec<Argument>,
        result_type: Option<TypeExpression>,
        body: Option<Expression>,
    },
    ExternalFunction {
        args: Vec<Argument>,
        result_type: TypeExpression,
        extern_name: String,
    },
    NativeFunction {
        args: Vec<Argument>,
        result_type: TypeExpression,
        native_name: String,
    },
}

/// A top-level or module-scoped function binding. `pos` is the defined
/// identifier's position (spec.md §6), never an annotation's or
/// modifier's, even when those precede it across a line break.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub ident: String,
    pub pos: Position,
    pub access: AccessModifier,
    pub annotations: Vec<Annotation>,
    pub is_template: bool,
    pub inst_type_params: Option<Vec<TypeExpression>>,
    pub inline: InlineModifier,
    pub modifier: FunctionModifier,
    pub function: Function,
}
