//! Front-end library: lexes and parses source text into an unresolved
//! [`Tree`] of [`ast::Definition`] nodes (spec.md §1).

pub mod ast;
pub mod builtins;
pub mod error;
pub mod ident;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod source;
pub mod token;
pub mod tree;

pub use builtins::BuiltinTypeAdder;
pub use error::{Error, ErrorKind, Errors};
pub use ident::{AbsoluteIdentifier, Identifier, Key, RelativeIdentifier};
pub use intern::{AbsoluteIdentifierTable, AlreadyPresent};
pub use lexer::{Lexer, ParserConfig};
pub use parser::Parser;
pub use resolver::Resolver;
pub use source::{Position, Source};
pub use tree::{DefinitionList, Tree};
