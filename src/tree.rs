//! Owning container for all parsed definitions (spec.md §3 "Tree",
//! §4.4).

use crate::ast::Definition;

/// One source's worth of top-level definitions, in parse order (spec.md
/// §3 "DefinitionList").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionList {
    pub defs: Vec<Definition>,
}

impl DefinitionList {
    pub fn new() -> Self {
        DefinitionList::default()
    }

    pub fn push(&mut self, def: Definition) {
        self.defs.push(def);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.defs.iter()
    }
}

/// Owns every `DefinitionList` produced across all parsed sources.
/// Append-only during parsing; exposes iteration in source-insertion
/// order (spec.md §4.4, §5 "Ordering guarantees").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub defs: Vec<DefinitionList>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    /// Appends a freshly parsed source's definitions, preserving the
    /// `{ source_index, definition_index }` ordering spec.md §5 requires.
    pub fn push_source(&mut self, list: DefinitionList) {
        self.defs.push(list);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.defs.iter().flat_map(|list| list.iter())
    }

    pub fn definition_count(&self) -> usize {
        self.defs.iter().map(|list| list.defs.len()).sum()
    }
}
