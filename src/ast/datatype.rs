//! Algebraic datatypes and their constructors (spec.md §3 "Datatype",
//! "Constructor").

use crate::ast::modifiers::{AccessModifier, Annotation, InlineModifier};
use crate::ast::ty::TypeExpression;
use crate::source::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Constructor {
    UnnamedFieldConstructor {
        ident: String,
        field_types: Vec<TypeExpression>,
        annotations: Vec<Annotation>,
        access: AccessModifier,
        inline: InlineModifier,
        pos: Position,
    },
    NamedFieldConstructor {
        ident: String,
        fields: Vec<(String, TypeExpression)>,
        annotations: Vec<Annotation>,
        access: AccessModifier,
        inline: InlineModifier,
        pos: Position,
    },
}

impl Constructor {
    pub fn ident(&self) -> &str {
        match self {
            Constructor::UnnamedFieldConstructor { ident, .. } => ident,
            Constructor::NamedFieldConstructor { ident, .. } => ident,
        }
    }
}

/// A datatype's constructor set, tagged by linearity (spec.md §3, §9
/// "Unique datatype" / "Non-unique datatype").
#[derive(Debug, Clone, PartialEq)]
pub enum Datatype {
    NonUniqueDatatype { constrs: Vec<Constructor> },
    UniqueDatatype { constrs: Vec<Constructor> },
}
