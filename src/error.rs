//! Collected parse errors (spec.md §4.6, §7).
//!
//! Grounded in the teacher project's `error.rs` (`ParseError` + `ParseErrorKind`
//! + `display_with_source`), trimmed of its natural-language-specific
//! variants and its color/typo-suggestion UX, which belong to that
//! project's CLI rather than this crate's library surface.

use std::fmt;

use crate::source::Position;
use crate::token::TokenKind;

#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Unterminated literal, bad escape, bad number suffix, invalid
    /// character (spec.md §7).
    Lexical(String),
    /// Unexpected token, missing delimiter, invalid definition head.
    Syntax { expected: String, found: TokenKind },
    /// e.g. two `private`, two `inline`.
    DuplicateModifier(&'static str),
    /// e.g. `extern` and `native` together.
    ConflictingModifiers(&'static str, &'static str),
    /// I/O failure opening a source (spec.md §7 "User-visible failure
    /// behavior").
    SourceUnreadable(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical(msg) => write!(f, "{msg}"),
            ErrorKind::Syntax { expected, found } => {
                write!(f, "expected {expected}, found {}", found.describe())
            }
            ErrorKind::DuplicateModifier(name) => write!(f, "duplicate `{name}` modifier"),
            ErrorKind::ConflictingModifiers(a, b) => {
                write!(f, "`{a}` and `{b}` cannot appear together")
            }
            ErrorKind::SourceUnreadable(reason) => write!(f, "source unreadable: {reason}"),
        }
    }
}

/// One collected error with its originating position (spec.md §4.6).
/// Duplicates are allowed; the parser never throws, it appends and
/// continues (spec.md §7).
#[derive(Debug, Clone)]
pub struct Error {
    pub pos: Position,
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(pos: Position, kind: ErrorKind) -> Self {
        Error { pos, kind }
    }

    /// Renders `error: <message>` plus a caret-underlined source excerpt,
    /// in the spirit of the teacher's `ParseError::display_with_source`
    /// (SPEC_FULL.md §C) but without its color codes or typo hints.
    pub fn display_with_source(&self) -> String {
        let source_text = self.pos.source.text();
        let line = source_text
            .lines()
            .nth((self.pos.line - 1) as usize)
            .unwrap_or("");
        let caret_col = (self.pos.column.saturating_sub(1)) as usize;
        format!(
            "error: {}\n\n{:4} | {}\n     | {}^",
            self.kind,
            self.pos.line,
            line,
            " ".repeat(caret_col)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.kind)
    }
}

impl std::error::Error for Error {}

/// Appended to, never thrown: this is a type alias rather than a wrapper
/// struct so `Parser::parse`'s signature matches spec.md §4.3 exactly
/// (`&mut errors: Vec<Error>`).
pub type Errors = Vec<Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Position, Source};

    #[test]
    fn display_with_source_underlines_the_column() {
        let source = Source::new("t.lsf", "All men mortal are.");
        let pos = Position {
            source,
            line: 1,
            column: 9,
            offset: 8,
        };
        let err = Error::new(pos, ErrorKind::Lexical("bad token".into()));
        let rendered = err.display_with_source();
        assert!(rendered.contains("bad token"));
        assert!(rendered.contains("mortal"));
    }

    #[test]
    fn display_shows_position_and_message() {
        let source = Source::new("t.lsf", "x");
        let pos = Position::start_of(source);
        let err = Error::new(pos, ErrorKind::DuplicateModifier("private"));
        let rendered = format!("{err}");
        assert!(rendered.contains("t.lsf:1:1"));
        assert!(rendered.contains("duplicate `private`"));
    }
}
