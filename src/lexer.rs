//! Token stream production (spec.md §4.2).
//!
//! Structured the way the teacher's `lexer.rs` stages its `LineLexer`: a
//! single forward pass over a [`Cursor`] that classifies characters into
//! token kinds and maintains just enough state (comment nesting, the
//! previous significant token) to decide layout. Unlike the teacher's
//! two-stage line/word lexer (built for an indentation-sensitive natural
//! language front end), this language's only layout token is `Newline`,
//! so one stage suffices.

use crate::error::{Error, ErrorKind};
use crate::source::{Cursor, Source};
use crate::token::{FloatKind, IntKind, Keyword, Punct, Token, TokenKind};

/// Tab width and other knobs a caller may configure (spec.md §4.1,
/// SPEC_FULL.md §D).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserConfig {
    pub tab_width: u32,
    pub max_comment_depth: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            tab_width: 1,
            max_comment_depth: 64,
        }
    }
}

/// Keywords whose presence means a value is already syntactically complete
/// (literal-producing keywords): a newline right after one of these ends a
/// statement rather than continuing it.
fn keyword_is_value_complete(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::True
            | Keyword::False
            | Keyword::Nil
            | Keyword::InfF
            | Keyword::InfD
            | Keyword::Inf
            | Keyword::NanF
            | Keyword::NanD
            | Keyword::Nan
    )
}

/// Whether a newline immediately following `prev` should be swallowed
/// rather than turned into a `Newline` token (spec.md §4.2 layout rules).
fn continues_line(prev: &TokenKind) -> bool {
    match prev {
        TokenKind::Punct(p) => !matches!(p, Punct::RParen | Punct::RBracket | Punct::RBrace),
        TokenKind::OperatorIdent(_) => true,
        TokenKind::BacktickIdent(_) => true,
        TokenKind::Keyword(kw) => !keyword_is_value_complete(*kw),
        _ => false,
    }
}

const OPERATOR_CHARS: &str = "+-*/%<>=!&|$^~?";

/// Produces tokens for one [`Source`]. Not restartable: callers that need
/// lookahead collect the whole stream first (the parser keeps a one-token
/// peek buffer on top of this).
pub struct Lexer<'cfg> {
    cursor: Cursor,
    config: &'cfg ParserConfig,
    comment_depth: u32,
    last_significant: Option<TokenKind>,
    errors: Vec<Error>,
}

impl<'cfg> Lexer<'cfg> {
    pub fn new(source: Source, config: &'cfg ParserConfig) -> Self {
        Lexer {
            cursor: Cursor::new(source, config.tab_width),
            config,
            comment_depth: 0,
            last_significant: None,
            errors: Vec::new(),
        }
    }

    /// Lexes the entire source into a token vector plus any lexical
    /// errors collected along the way (spec.md §4.2 "Failure modes").
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Error>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn push_error(&mut self, pos: crate::source::Position, message: impl Into<String>) {
        self.errors.push(Error::new(pos, ErrorKind::Lexical(message.into())));
    }

    fn next_token(&mut self) -> Token {
        loop {
            if self.skip_insignificant_once() {
                continue;
            }
            let pos = self.cursor.position();
            let Some(c) = self.cursor.peek() else {
                return Token::new(TokenKind::Eof, pos);
            };

            if c == '\n' || c == '\r' {
                let was_continuing = self
                    .last_significant
                    .as_ref()
                    .map(continues_line)
                    .unwrap_or(true);
                self.cursor.advance();
                if was_continuing {
                    continue;
                }
                return Token::new(TokenKind::Newline, pos);
            }

            let kind = if c.is_ascii_digit()
                || (c == '.' && self.cursor.peek2().map(|d| d.is_ascii_digit()).unwrap_or(false))
            {
                self.scan_number(pos.clone())
            } else if c == '\'' {
                self.scan_char_literal(pos.clone(), false)
            } else if c == '"' {
                self.scan_string_literal(pos.clone(), false)
            } else if c == 'w' && matches!(self.cursor.peek2(), Some('\'') | Some('"')) {
                self.cursor.advance();
                match self.cursor.peek() {
                    Some('\'') => self.scan_char_literal(pos.clone(), true),
                    _ => self.scan_string_literal(pos.clone(), true),
                }
            } else if c == '`' {
                self.scan_backtick_ident(pos.clone())
            } else if c == '.' && !self.cursor.peek2().map(|c| c.is_ascii_digit()).unwrap_or(false)
            {
                self.cursor.advance();
                TokenKind::Punct(Punct::Dot)
            } else if is_ident_start(c) {
                self.scan_word(pos.clone())
            } else if OPERATOR_CHARS.contains(c) {
                self.scan_operator_or_punct(pos.clone())
            } else {
                self.cursor.advance();
                match c {
                    ';' => TokenKind::Punct(Punct::Semi),
                    ':' => TokenKind::Punct(Punct::Colon),
                    '(' => TokenKind::Punct(Punct::LParen),
                    ')' => TokenKind::Punct(Punct::RParen),
                    '[' => TokenKind::Punct(Punct::LBracket),
                    ']' => TokenKind::Punct(Punct::RBracket),
                    '{' => TokenKind::Punct(Punct::LBrace),
                    '}' => TokenKind::Punct(Punct::RBrace),
                    ',' => TokenKind::Punct(Punct::Comma),
                    _ => {
                        self.push_error(pos.clone(), format!("unexpected character '{c}'"));
                        continue_after_error(self);
                        continue;
                    }
                }
            };
            self.last_significant = Some(kind.clone());
            return Token::new(kind, pos);
        }
    }

    /// Skips one run of whitespace-or-comment trivia. Returns `true` if
    /// anything was consumed, so the caller can loop until trivia is
    /// exhausted without recursing.
    fn skip_insignificant_once(&mut self) -> bool {
        match self.cursor.peek() {
            Some(' ') | Some('\t') => {
                self.cursor.advance();
                true
            }
            Some('/') if self.cursor.peek2() == Some('/') => {
                while !self.cursor.is_eof() && self.cursor.peek() != Some('\n') {
                    self.cursor.advance();
                }
                true
            }
            Some('/') if self.cursor.peek2() == Some('*') => {
                self.scan_block_comment();
                true
            }
            _ => false,
        }
    }

    fn scan_block_comment(&mut self) {
        let start_pos = self.cursor.position();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        self.comment_depth = 1;
        while self.comment_depth > 0 {
            if self.comment_depth > self.config.max_comment_depth {
                self.push_error(start_pos.clone(), "block comment nesting too deep");
                break;
            }
            match (self.cursor.peek(), self.cursor.peek2()) {
                (Some('/'), Some('*')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.comment_depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.comment_depth -= 1;
                }
                (None, _) => {
                    self.push_error(start_pos.clone(), "unterminated block comment");
                    break;
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        self.comment_depth = 0;
    }

    fn scan_word(&mut self, pos: crate::source::Position) -> TokenKind {
        let start = self.cursor.offset();
        while let Some(c) = self.cursor.peek() {
            if is_ident_continue(c) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        let text = self.cursor_slice(start);
        if let Some(kw) = Keyword::from_word(&text) {
            return TokenKind::Keyword(kw);
        }
        let _ = pos;
        let first_upper = text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if first_upper {
            TokenKind::UpperIdent(text)
        } else {
            TokenKind::Ident(text)
        }
    }

    fn scan_operator_or_punct(&mut self, _pos: crate::source::Position) -> TokenKind {
        let start = self.cursor.offset();
        while let Some(c) = self.cursor.peek() {
            if OPERATOR_CHARS.contains(c) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        let text = self.cursor_slice(start);
        match text.as_str() {
            "=" => TokenKind::Punct(Punct::Equals),
            "->" => TokenKind::Punct(Punct::Arrow),
            "@" => TokenKind::Punct(Punct::At),
            _ => TokenKind::OperatorIdent(text),
        }
    }

    fn scan_backtick_ident(&mut self, pos: crate::source::Position) -> TokenKind {
        let quote_len = if self.cursor.remaining().starts_with("``") {
            2
        } else {
            1
        };
        for _ in 0..quote_len {
            self.cursor.advance();
        }
        let start = self.cursor.offset();
        let closing = "`".repeat(quote_len);
        loop {
            if self.cursor.remaining().starts_with(&closing) {
                break;
            }
            if self.cursor.advance().is_none() {
                self.push_error(pos, "unterminated backtick identifier");
                break;
            }
        }
        let text = self.cursor_slice(start);
        for _ in 0..quote_len {
            self.cursor.advance();
        }
        TokenKind::BacktickIdent(text)
    }

    fn cursor_slice(&self, start: usize) -> String {
        self.cursor.position().source.text()[start..self.cursor.offset()].to_string()
    }

    fn scan_number(&mut self, pos: crate::source::Position) -> TokenKind {
        let start = self.cursor.offset();
        let mut is_float = false;

        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek2(), Some('x') | Some('X'))
        {
            self.cursor.advance();
            self.cursor.advance();
            while self
                .cursor
                .peek()
                .map(|c| c.is_ascii_hexdigit())
                .unwrap_or(false)
            {
                self.cursor.advance();
            }
            let text = self.cursor_slice(start);
            return self.finish_int_literal(&text, 16, pos);
        }

        while self.cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.cursor.advance();
        }
        if self.cursor.peek() == Some('.')
            && self.cursor.peek2().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_float = true;
            self.cursor.advance();
            while self.cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.cursor.advance();
            }
        } else if self.cursor.peek() == Some('.')
            && !self.cursor.peek2().map(is_ident_start).unwrap_or(false)
        {
            // `digits.` not followed by a member name is still a float form;
            // `5.foo` instead keeps the dot for member access.
            is_float = true;
            self.cursor.advance();
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                self.cursor.advance();
            }
            while self.cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.cursor.advance();
            }
        }

        let next_continues_ident = self.cursor.peek2().map(is_ident_continue).unwrap_or(false);
        let suffix = match self.cursor.peek() {
            Some('f') | Some('F') if !next_continues_ident => {
                self.cursor.advance();
                Some('f')
            }
            Some('d') | Some('D') if !next_continues_ident => {
                self.cursor.advance();
                Some('d')
            }
            _ => None,
        };
        if suffix.is_some() {
            is_float = true;
        }

        let text = self.cursor_slice(start);
        if is_float {
            self.finish_float_literal(&text, suffix, pos)
        } else {
            // possible integer suffix i8/i16/i32/i64
            if self.cursor.remaining().starts_with('i') {
                let save = self.cursor.clone();
                self.cursor.advance();
                let suffix_start = self.cursor.offset();
                while self.cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    self.cursor.advance();
                }
                let suffix_digits = self.cursor_slice(suffix_start);
                let suffix_ends_cleanly =
                    !self.cursor.peek().map(is_ident_continue).unwrap_or(false);
                if suffix_ends_cleanly && matches!(suffix_digits.as_str(), "8" | "16" | "32" | "64")
                {
                    let full_text = self.cursor_slice(start);
                    return self.finish_int_literal(&full_text, 10, pos);
                }
                self.cursor = save;
            }
            self.finish_int_literal(&text, 10, pos)
        }
    }

    fn finish_int_literal(
        &mut self,
        text: &str,
        radix: u32,
        pos: crate::source::Position,
    ) -> TokenKind {
        let (digits, suffix) = split_int_suffix(text);
        let kind = match suffix {
            Some("i8") => IntKind::I8,
            Some("i16") => IntKind::I16,
            Some("i32") => IntKind::I32,
            Some("i64") | None => IntKind::I64,
            Some(_) => IntKind::I64,
        };
        let clean = if radix == 16 {
            digits.trim_start_matches("0x").trim_start_matches("0X")
        } else {
            digits
        };
        match i64::from_str_radix(clean, radix) {
            Ok(value) => TokenKind::IntLit(kind, value),
            Err(_) => {
                self.push_error(pos, format!("invalid integer literal '{text}'"));
                TokenKind::IntLit(kind, 0)
            }
        }
    }

    fn finish_float_literal(
        &mut self,
        text: &str,
        suffix: Option<char>,
        pos: crate::source::Position,
    ) -> TokenKind {
        let kind = match suffix {
            Some('f') | Some('F') => FloatKind::Single,
            _ => FloatKind::Double,
        };
        let digits = match suffix {
            Some(_) => &text[..text.len() - 1],
            None => text,
        };
        match digits.parse::<f64>() {
            Ok(value) => TokenKind::FloatLit(kind, value),
            Err(_) => {
                self.push_error(pos, format!("invalid float literal '{text}'"));
                TokenKind::FloatLit(kind, 0.0)
            }
        }
    }

    fn scan_char_literal(&mut self, pos: crate::source::Position, wide: bool) -> TokenKind {
        self.cursor.advance(); // opening quote
        let value = match self.scan_one_escaped_char(wide, &pos) {
            Some(v) => v,
            None => 0,
        };
        if self.cursor.peek() == Some('\'') {
            self.cursor.advance();
        } else {
            self.push_error(pos, "unterminated character literal");
        }
        if wide {
            TokenKind::WCharLit(value)
        } else {
            TokenKind::CharLit(value as u8)
        }
    }

    fn scan_string_literal(&mut self, pos: crate::source::Position, wide: bool) -> TokenKind {
        self.cursor.advance(); // opening quote
        let mut bytes = Vec::new();
        let mut wide_chars = Vec::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.push_error(pos.clone(), "unterminated string literal");
                    break;
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') if self.cursor.peek2() == Some('\n') => {
                    // line continuation: backslash-newline joins next line.
                    self.cursor.advance();
                    self.cursor.advance();
                }
                _ => {
                    if let Some(v) = self.scan_one_escaped_char(wide, &pos) {
                        if wide {
                            wide_chars.push(v);
                        } else {
                            bytes.push(v as u8);
                        }
                    }
                }
            }
        }
        if wide {
            TokenKind::WStringLit(wide_chars)
        } else {
            TokenKind::StringLit(bytes)
        }
    }

    /// Scans one (possibly escaped) character/codepoint from a char or
    /// string literal body. Returns `None` only on an unrecoverable error
    /// (already reported).
    fn scan_one_escaped_char(&mut self, wide: bool, pos: &crate::source::Position) -> Option<u32> {
        let c = self.cursor.peek()?;
        if c != '\\' {
            self.cursor.advance();
            return Some(c as u32);
        }
        self.cursor.advance(); // backslash
        let esc = self.cursor.peek()?;
        match esc {
            'n' => {
                self.cursor.advance();
                Some(b'\n' as u32)
            }
            'r' => {
                self.cursor.advance();
                Some(b'\r' as u32)
            }
            't' => {
                self.cursor.advance();
                Some(b'\t' as u32)
            }
            '\\' => {
                self.cursor.advance();
                Some(b'\\' as u32)
            }
            '\'' => {
                self.cursor.advance();
                Some(b'\'' as u32)
            }
            '"' => {
                self.cursor.advance();
                Some(b'"' as u32)
            }
            'x' => {
                self.cursor.advance();
                self.take_hex_digits(1, 2)
                    .and_then(|hex| u32::from_str_radix(&hex, 16).ok())
                    .or_else(|| {
                        self.push_error(pos.clone(), "invalid \\x escape");
                        None
                    })
            }
            'u' if wide => {
                self.cursor.advance();
                self.take_hex_digits(4, 4)
                    .and_then(|hex| u32::from_str_radix(&hex, 16).ok())
                    .or_else(|| {
                        self.push_error(pos.clone(), "invalid \\u escape, expected 4 hex digits");
                        None
                    })
            }
            'U' if wide => {
                self.cursor.advance();
                self.take_hex_digits(8, 8)
                    .and_then(|hex| u32::from_str_radix(&hex, 16).ok())
                    .or_else(|| {
                        self.push_error(pos.clone(), "invalid \\U escape, expected 8 hex digits");
                        None
                    })
            }
            '0'..='7' => {
                let digits = self.take_octal_digits(1, 3);
                u32::from_str_radix(&digits, 8).ok().or_else(|| {
                    self.push_error(pos.clone(), "invalid octal escape");
                    None
                })
            }
            other => {
                self.cursor.advance();
                self.push_error(pos.clone(), format!("unknown escape '\\{other}'"));
                Some(other as u32)
            }
        }
    }

    /// Consumes up to `max` hex digits, stopping early at a non-hex-digit.
    /// Returns `None` if fewer than `min` digits were found, so callers
    /// (`\x`, `\u`, `\U` escapes) can reject a too-short run instead of
    /// silently accepting it (spec.md §4.2 "exactly 4"/"exactly 8" hex
    /// digits for `\u`/`\U`).
    fn take_hex_digits(&mut self, min: usize, max: usize) -> Option<String> {
        let mut s = String::new();
        while s.len() < max {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    s.push(c);
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        if s.len() < min {
            None
        } else {
            Some(s)
        }
    }

    fn take_octal_digits(&mut self, min: usize, max: usize) -> String {
        let mut s = String::new();
        while s.len() < max {
            match self.cursor.peek() {
                Some(c) if ('0'..='7').contains(&c) => {
                    s.push(c);
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        let _ = min;
        s
    }
}

fn continue_after_error(lexer: &mut Lexer<'_>) {
    // Resynchronize to the next whitespace or bracket boundary (spec.md
    // §4.2 "Failure modes").
    while let Some(c) = lexer.cursor.peek() {
        if c.is_whitespace() || "()[]{}".contains(c) {
            break;
        }
        lexer.cursor.advance();
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn split_int_suffix(text: &str) -> (&str, Option<&str>) {
    for suffix in ["i64", "i32", "i16", "i8"] {
        if let Some(digits) = text.strip_suffix(suffix) {
            return (digits, Some(suffix));
        }
    }
    (text, None)
}
