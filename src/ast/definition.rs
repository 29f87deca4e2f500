//! The top-level `Definition` variant family (spec.md §3) and the
//! instance/import/module wrappers around it.

use crate::ast::function::FunctionDefinition;
use crate::ast::typefun::TypeFunctionDefinition;
use crate::ast::typevar::TypeVariableDefinition;
use crate::ast::variable::VariableDefinition;
use crate::ident::Identifier;
use crate::source::Position;

/// `import <qualified_path>` (spec.md §4.3 "import").
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub target: Identifier,
    pub pos: Position,
}

/// `module <qualified_path> { ... }` (spec.md §4.3 "module_def").
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDefinition {
    pub target: Identifier,
    pub body: Vec<Definition>,
    pub pos: Position,
}

/// `instance` wrapper around a variable definition (spec.md §3
/// "VariableInstanceDefinition").
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInstanceDefinition {
    pub definition: VariableDefinition,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInstanceDefinition {
    pub definition: FunctionDefinition,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeFunctionInstanceDefinition {
    pub definition: TypeFunctionDefinition,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Import(Import),
    ModuleDefinition(ModuleDefinition),
    VariableDefinition(VariableDefinition),
    FunctionDefinition(FunctionDefinition),
    TypeVariableDefinition(TypeVariableDefinition),
    TypeFunctionDefinition(TypeFunctionDefinition),
    VariableInstanceDefinition(VariableInstanceDefinition),
    FunctionInstanceDefinition(FunctionInstanceDefinition),
    TypeFunctionInstanceDefinition(TypeFunctionInstanceDefinition),
}

impl Definition {
    /// The position of the *defined identifier*, never a leading modifier
    /// or annotation (spec.md §6 "Definition position semantics").
    pub fn pos(&self) -> &Position {
        match self {
            Definition::Import(d) => &d.pos,
            Definition::ModuleDefinition(d) => &d.pos,
            Definition::VariableDefinition(d) => &d.pos,
            Definition::FunctionDefinition(d) => &d.pos,
            Definition::TypeVariableDefinition(d) => &d.pos,
            Definition::TypeFunctionDefinition(d) => &d.pos,
            Definition::VariableInstanceDefinition(d) => &d.pos,
            Definition::FunctionInstanceDefinition(d) => &d.pos,
            Definition::TypeFunctionInstanceDefinition(d) => &d.pos,
        }
    }
}
