//! Name resolution is an explicit non-goal of this crate (spec.md §1,
//! §6). `Resolver` is an interface stub only: it names the collaborator
//! downstream passes implement, so this crate's public API matches
//! spec.md §6 exactly, without pulling any resolution logic in-tree.

use crate::error::Errors;
use crate::intern::AbsoluteIdentifierTable;
use crate::tree::Tree;

/// Downstream collaborator that consumes the parsed [`Tree`] and the
/// identifier table to bind names to definitions. Implementing it is out
/// of scope here (spec.md §1 "Deliberately out of scope").
pub trait Resolver {
    fn resolve(&mut self, tree: &mut Tree, table: &mut AbsoluteIdentifierTable, errors: &mut Errors) -> bool;
}
