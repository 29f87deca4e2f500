//! Seeds a [`Tree`] with primitive type entries before (or after)
//! parsing (spec.md §6 "BuiltinTypeAdder").
//!
//! The registration logic proper — what a primitive type actually means
//! to later passes — is out of scope (spec.md §1); this collaborator
//! only needs to exist at the interface level so callers can wire it in
//! ahead of the resolver.

use crate::ast::{AccessModifier, Datatype, Definition, TypeVariable, TypeVariableDefinition};
use crate::source::{Position, Source};
use crate::tree::{DefinitionList, Tree};

const PRIMITIVE_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "Float", "Double", "Char", "WChar", "Bool",
];

/// Collaborator named in spec.md §6; seeds `tree` with a
/// `TypeVariableDefinition` per name in [`PRIMITIVE_TYPES`], each an
/// empty-constructor-set `NonUniqueDatatype` at the synthetic source
/// `"<builtin>"`.
pub struct BuiltinTypeAdder;

impl BuiltinTypeAdder {
    /// Returns `true` unconditionally: seeding primitive types cannot
    /// itself fail (spec.md §6 keeps the `-> bool` contract uniform with
    /// `Parser::parse` and `Resolver::resolve`).
    pub fn add_builtin_types(tree: &mut Tree) -> bool {
        let source = Source::new("<builtin>", "");
        let mut list = DefinitionList::new();
        for name in PRIMITIVE_TYPES {
            list.push(Definition::TypeVariableDefinition(TypeVariableDefinition {
                ident: name.to_string(),
                pos: Position::start_of(source.clone()),
                access: AccessModifier::None,
                is_template: false,
                inst_type_params: None,
                type_variable: TypeVariable::DatatypeVariable {
                    datatype: Datatype::NonUniqueDatatype { constrs: Vec::new() },
                },
            }));
        }
        tree.push_source(list);
        true
    }
}
