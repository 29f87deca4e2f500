//! `TypeVariable` definitions: type synonyms and nullary datatypes
//! (spec.md §3 "TypeVariable").

use crate::ast::datatype::Datatype;
use crate::ast::modifiers::AccessModifier;
use crate::ast::ty::TypeExpression;
use crate::source::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeVariable {
    TypeSynonymVariable { expr: TypeExpression },
    DatatypeVariable { datatype: Datatype },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeVariableDefinition {
    pub ident: String,
    pub pos: Position,
    pub access: AccessModifier,
    pub is_template: bool,
    pub inst_type_params: Option<Vec<TypeExpression>>,
    pub type_variable: TypeVariable,
}
