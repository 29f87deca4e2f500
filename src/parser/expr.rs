//! Expression and type-expression parsing: qualified paths, call/
//! constructor application, and the precedence-climbing operator parser
//! (spec.md §4.3 "Operator handling", §8 property 8).

use crate::ast::{Argument, Expression, FunctionModifier, LiteralValue, TypeExpression};
use crate::error::ErrorKind;
use crate::ident::{AbsoluteIdentifier, Identifier, RelativeIdentifier};
use crate::source::Position;
use crate::token::{FloatKind, Keyword, Punct, TokenKind};

use super::ParserState;

/// Binding powers for the infix operator table (spec.md §4.3): `.` member
/// access binds tightest of all (handled inside primary parsing, never
/// entering this table), then prefix `-`, then these, loosest-to-tightest
/// `||` < `&&` < comparisons < `+ -` < `* / %`. Backtick-quoted infix
/// identifiers sit just above `$`, the loosest operator of all — an Open
/// Question the concrete scenarios never pin down (see DESIGN.md).
fn binop_binding_power(text: &str) -> Option<(u8, u8)> {
    Some(match text {
        "*" | "/" | "%" => (50, 51),
        "+" | "-" => (40, 41),
        "==" | "!=" | "<" | ">" | "<=" | ">=" => (30, 31),
        "&&" => (20, 21),
        "||" => (10, 11),
        "$" => (1, 0),
        _ => return None,
    })
}

const BACKTICK_BINDING_POWER: (u8, u8) = (5, 6);
const PREFIX_BINDING_POWER: u8 = 60;

impl ParserState {
    pub(super) fn parse_expr(&mut self, min_bp: u8) -> Result<Expression, ()> {
        let mut lhs = self.parse_prefix()?;
        loop {
            let (op_text, op_pos, bp) = match self.peek_operator() {
                Some(v) => v,
                None => break,
            };
            let (lbp, rbp) = bp;
            if lbp < min_bp {
                break;
            }
            self.bump();
            let rhs = self.parse_expr(rbp)?;
            lhs = fold_or_apply(op_text, op_pos, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Looks at (without consuming) the current token to see whether it's
    /// an infix operator, returning its text, position, and binding power.
    fn peek_operator(&mut self) -> Option<(String, Position, (u8, u8))> {
        match self.cur_kind() {
            TokenKind::OperatorIdent(text) => {
                let bp = binop_binding_power(&text)?;
                Some((text, self.cur_pos(), bp))
            }
            TokenKind::BacktickIdent(text) => Some((text, self.cur_pos(), BACKTICK_BINDING_POWER)),
            _ => None,
        }
    }

    fn parse_prefix(&mut self) -> Result<Expression, ()> {
        if let TokenKind::OperatorIdent(text) = self.cur_kind() {
            if text == "-" {
                let op_pos = self.bump().pos;
                let operand = self.parse_expr(PREFIX_BINDING_POWER)?;
                return Ok(match operand {
                    Expression::Literal(LiteralValue::IntValue(kind, n), _) => {
                        Expression::Literal(LiteralValue::IntValue(kind, n.wrapping_neg()), op_pos)
                    }
                    Expression::Literal(LiteralValue::FloatValue(kind, f), _) => {
                        Expression::Literal(LiteralValue::FloatValue(kind, -f), op_pos)
                    }
                    other => Expression::NonUniqueApplication {
                        modifier: FunctionModifier::None,
                        fun: Box::new(Expression::VariableExpression(
                            Identifier::Relative(RelativeIdentifier::single("unary_-")),
                            op_pos.clone(),
                        )),
                        args: vec![other],
                        pos: op_pos,
                    },
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ()> {
        match self.cur_kind() {
            TokenKind::IntLit(kind, n) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::IntValue(kind, n), pos))
            }
            TokenKind::FloatLit(kind, f) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::FloatValue(kind, f), pos))
            }
            TokenKind::CharLit(c) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::CharValue(c), pos))
            }
            TokenKind::WCharLit(c) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::WideCharValue(c), pos))
            }
            TokenKind::StringLit(s) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::StringValue(s), pos))
            }
            TokenKind::WStringLit(s) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::WideStringValue(s), pos))
            }
            TokenKind::Keyword(Keyword::True) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::Bool(true), pos))
            }
            TokenKind::Keyword(Keyword::False) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::Bool(false), pos))
            }
            TokenKind::Keyword(Keyword::Nil) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::Nil, pos))
            }
            TokenKind::Keyword(Keyword::InfF) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::FloatValue(FloatKind::Single, f64::INFINITY), pos))
            }
            TokenKind::Keyword(Keyword::InfD) | TokenKind::Keyword(Keyword::Inf) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::FloatValue(FloatKind::Double, f64::INFINITY), pos))
            }
            TokenKind::Keyword(Keyword::NanF) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::FloatValue(FloatKind::Single, f64::NAN), pos))
            }
            TokenKind::Keyword(Keyword::NanD) | TokenKind::Keyword(Keyword::Nan) => {
                let pos = self.bump().pos;
                Ok(Expression::Literal(LiteralValue::FloatValue(FloatKind::Double, f64::NAN), pos))
            }
            TokenKind::Punct(Punct::LParen) => {
                self.bump();
                let inner = self.parse_expr(0)?;
                self.expect_punct(Punct::RParen)?;
                Ok(inner)
            }
            TokenKind::Punct(Punct::Dot) | TokenKind::Ident(_) | TokenKind::UpperIdent(_) => {
                self.parse_ident_expr()
            }
            found => {
                let pos = self.cur_pos();
                self.error(
                    pos,
                    ErrorKind::Syntax {
                        expected: "an expression".to_string(),
                        found,
                    },
                );
                Err(())
            }
        }
    }

    /// Parses a (possibly dotted, possibly absolute) identifier and, if
    /// followed directly by `(`, the call/constructor argument list that
    /// follows it. A capitalized final segment names a constructor
    /// (spec.md §3 "UpperIdent" token convention); anything else is an
    /// ordinary function application.
    fn parse_ident_expr(&mut self) -> Result<Expression, ()> {
        let (ident, pos) = self.parse_qualified_path()?;
        let last_is_upper = last_segment_starts_upper(&ident);
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            self.bump();
            let args = self.parse_expr_list()?;
            self.expect_punct(Punct::RParen)?;
            if last_is_upper {
                Ok(Expression::ConstructorValue {
                    constr_ident: ident,
                    args,
                    pos,
                })
            } else {
                Ok(Expression::NonUniqueApplication {
                    modifier: FunctionModifier::None,
                    fun: Box::new(Expression::VariableExpression(ident, pos.clone())),
                    args,
                    pos,
                })
            }
        } else if last_is_upper {
            Ok(Expression::ConstructorValue {
                constr_ident: ident,
                args: Vec::new(),
                pos,
            })
        } else {
            Ok(Expression::VariableExpression(ident, pos))
        }
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expression>, ()> {
        let mut out = Vec::new();
        if self.cur_kind() == TokenKind::Punct(Punct::RParen) {
            return Ok(out);
        }
        loop {
            out.push(self.parse_expr(0)?);
            if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Parses `['.'] ident ('.' ident)*` (spec.md §4.3 "qualified_path"): a
    /// leading dot marks an [`Identifier::Absolute`], otherwise the path is
    /// relative. `import .` (no segments after the dot) is the one legal
    /// empty case, naming the root module.
    pub(super) fn parse_qualified_path(&mut self) -> Result<(Identifier, Position), ()> {
        let start_pos = self.cur_pos();
        let absolute = if self.cur_kind() == TokenKind::Punct(Punct::Dot) {
            self.bump();
            true
        } else {
            false
        };
        let mut segments = Vec::new();
        if matches!(self.cur_kind(), TokenKind::Ident(_) | TokenKind::UpperIdent(_)) {
            let (first, _) = self.expect_ident()?;
            segments.push(first);
            while self.cur_kind() == TokenKind::Punct(Punct::Dot) {
                self.bump();
                let (seg, _) = self.expect_ident()?;
                segments.push(seg);
            }
        }
        if absolute {
            Ok((Identifier::Absolute(AbsoluteIdentifier::new(segments)), start_pos))
        } else if segments.is_empty() {
            let pos = self.cur_pos();
            self.error(
                pos,
                ErrorKind::Syntax {
                    expected: "identifier".to_string(),
                    found: self.cur_kind(),
                },
            );
            Err(())
        } else {
            Ok((Identifier::Relative(RelativeIdentifier::new(segments)), start_pos))
        }
    }

    // --- function/type heads and arguments -------------------------------

    /// `head` (spec.md §4.3): `ident '(' args ')'`, `arg OP arg`, or
    /// `OP arg` — the three ways a function definition names itself and
    /// its parameters. Returns `(defined_name, args, defined_name_pos)`;
    /// callers handle any trailing `': type'` themselves.
    pub(super) fn parse_head(&mut self) -> Result<(String, Vec<Argument>, Position), ()> {
        if let TokenKind::OperatorIdent(op) = self.cur_kind() {
            let op_pos = self.bump().pos;
            let arg = self.parse_arg(0)?;
            // Prefix operator definitions are named the way prefix-minus
            // uses are (spec.md §3 "A segment `unary_-` is produced by the
            // parser for prefix operator definitions"), so a definition and
            // its call sites agree on the defined name.
            let name = if op == "-" { "unary_-".to_string() } else { op };
            return Ok((name, vec![arg], op_pos));
        }
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            let arg1 = self.parse_arg(0)?;
            let op_pos = self.cur_pos();
            if let TokenKind::OperatorIdent(op) = self.cur_kind() {
                self.bump();
                let arg2 = self.parse_arg(1)?;
                return Ok((op, vec![arg1, arg2], op_pos));
            }
            let found = self.cur_kind();
            self.error(
                op_pos.clone(),
                ErrorKind::Syntax {
                    expected: "an operator after a parenthesized argument".to_string(),
                    found,
                },
            );
            return Err(());
        }
        let (name, name_pos) = self.expect_ident()?;
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            self.bump();
            let args = self.parse_arg_list()?;
            self.expect_punct(Punct::RParen)?;
            Ok((name, args, name_pos))
        } else {
            let arg1 = Argument {
                position: 0,
                ident: name,
                type_expr: None,
                pos: name_pos,
            };
            let op_pos = self.cur_pos();
            if let TokenKind::OperatorIdent(op) = self.cur_kind() {
                self.bump();
                let arg2 = self.parse_arg(1)?;
                Ok((op, vec![arg1, arg2], op_pos))
            } else {
                let found = self.cur_kind();
                self.error(
                    op_pos.clone(),
                    ErrorKind::Syntax {
                        expected: "`(` or an operator after an identifier in a definition head".to_string(),
                        found,
                    },
                );
                Err(())
            }
        }
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Argument>, ()> {
        let mut args = Vec::new();
        if self.cur_kind() == TokenKind::Punct(Punct::RParen) {
            return Ok(args);
        }
        let mut position = 0;
        loop {
            args.push(self.parse_arg(position)?);
            position += 1;
            if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(args)
    }

    /// `arg` (spec.md §4.3): `ident [':' type_expr]` or `'(' ident ':'
    /// type_expr ')'`.
    fn parse_arg(&mut self, position: usize) -> Result<Argument, ()> {
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            self.bump();
            let (ident, pos) = self.expect_ident()?;
            self.expect_punct(Punct::Colon)?;
            let type_expr = Some(self.parse_type_expr()?);
            self.expect_punct(Punct::RParen)?;
            Ok(Argument { position, ident, type_expr, pos })
        } else {
            let (ident, pos) = self.expect_ident()?;
            let type_expr = if self.cur_kind() == TokenKind::Punct(Punct::Colon) {
                self.bump();
                Some(self.parse_type_expr()?)
            } else {
                None
            };
            Ok(Argument { position, ident, type_expr, pos })
        }
    }

    // --- type expressions -------------------------------------------------

    /// `type_expr = type_primary ['->' type_expr]` — `->` is right-
    /// associative and looser than application/tuple forms (spec.md §3
    /// "FunctionType").
    pub(super) fn parse_type_expr(&mut self) -> Result<TypeExpression, ()> {
        let primary = self.parse_type_primary()?;
        if self.cur_kind() == TokenKind::Punct(Punct::Arrow) {
            let pos = primary.pos().clone();
            self.bump();
            let result = self.parse_type_expr()?;
            Ok(TypeExpression::FunctionType {
                params: vec![primary],
                result: Box::new(result),
                pos,
            })
        } else {
            Ok(primary)
        }
    }

    fn parse_type_primary(&mut self) -> Result<TypeExpression, ()> {
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            let pos = self.cur_pos();
            self.bump();
            let mut elems = Vec::new();
            if self.cur_kind() != TokenKind::Punct(Punct::RParen) {
                loop {
                    elems.push(self.parse_type_expr()?);
                    if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            self.expect_punct(Punct::RParen)?;
            return Ok(if elems.len() == 1 {
                elems.into_iter().next().unwrap()
            } else {
                TypeExpression::TupleType { elems, pos }
            });
        }
        let (ident, pos) = self.parse_qualified_path()?;
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            self.bump();
            let mut args = Vec::new();
            if self.cur_kind() != TokenKind::Punct(Punct::RParen) {
                loop {
                    args.push(self.parse_type_expr()?);
                    if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            self.expect_punct(Punct::RParen)?;
            Ok(TypeExpression::TypeApplication {
                fun_ident: ident,
                args,
                pos,
            })
        } else {
            Ok(TypeExpression::TypeVariableExpression { ident, pos })
        }
    }
}

fn last_segment_starts_upper(ident: &Identifier) -> bool {
    let last = match ident {
        Identifier::Relative(rel) => rel.segments().last(),
        Identifier::Absolute(abs) => abs.segments().last(),
    };
    last.and_then(|s| s.chars().next()).is_some_and(|c| c.is_uppercase())
}

/// Builds the application node for an infix operator, folding a chain of
/// same-kind literal `-` operands into a single constant (spec.md §8
/// property 8: constant folding of literal negation only, never general
/// arithmetic — any other operator, or a non-literal operand, always
/// produces an ordinary `NonUniqueApplication`).
fn fold_or_apply(op_text: String, op_pos: Position, lhs: Expression, rhs: Expression) -> Expression {
    if op_text == "-" {
        if let (Expression::Literal(LiteralValue::IntValue(k1, n1), lpos), Expression::Literal(LiteralValue::IntValue(k2, n2), _)) =
            (&lhs, &rhs)
        {
            if k1 == k2 {
                return Expression::Literal(LiteralValue::IntValue(*k1, n1.wrapping_sub(*n2)), lpos.clone());
            }
        }
        if let (Expression::Literal(LiteralValue::FloatValue(k1, f1), lpos), Expression::Literal(LiteralValue::FloatValue(k2, f2), _)) =
            (&lhs, &rhs)
        {
            if k1 == k2 {
                return Expression::Literal(LiteralValue::FloatValue(*k1, f1 - f2), lpos.clone());
            }
        }
    }
    Expression::NonUniqueApplication {
        modifier: FunctionModifier::None,
        fun: Box::new(Expression::VariableExpression(
            Identifier::Relative(RelativeIdentifier::single(op_text)),
            op_pos.clone(),
        )),
        args: vec![lhs, rhs],
        pos: op_pos,
    }
}
