//! Literal values (spec.md §3 "LiteralValue", §4.2 "Literal grammar").

use crate::token::{FloatKind, IntKind};

/// A fully-evaluated literal token turned into an AST leaf. Constant
/// folding of a leading unary `-` onto an integer or infinity literal
/// (spec.md §4.2, §8 property 8) happens in the parser before this value
/// is constructed; `LiteralValue` itself never holds an unevaluated sign.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    IntValue(IntKind, i64),
    FloatValue(FloatKind, f64),
    CharValue(u8),
    WideCharValue(u32),
    StringValue(Vec<u8>),
    WideStringValue(Vec<u32>),
    Bool(bool),
    Nil,
}
