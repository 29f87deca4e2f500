//! `TypeFunction` definitions: parameterized type synonyms and datatypes
//! (spec.md §3 "TypeFunction").

use crate::ast::datatype::Datatype;
use crate::ast::modifiers::AccessModifier;
use crate::ast::ty::TypeExpression;
use crate::source::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeFunction {
    TypeSynonymFunction {
        args: Vec<String>,
        body: Option<TypeExpression>,
    },
    DatatypeFunction {
        args: Vec<String>,
        datatype: Datatype,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeFunctionDefinition {
    pub ident: String,
    pub pos: Position,
    pub access: AccessModifier,
    pub is_template: bool,
    pub inst_type_params: Option<Vec<TypeExpression>>,
    pub type_function: TypeFunction,
}
