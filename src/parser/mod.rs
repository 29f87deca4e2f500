//! Recursive-descent parser (spec.md §4.3).
//!
//! `Parser::parse` is the crate's single public entry point, matching
//! spec.md §6 exactly. Internally each source gets its own [`ParserState`]
//! — a token buffer plus a bracket-depth counter used to decide whether a
//! `Newline` token from the lexer is a real statement separator or layout
//! noise to discard (spec.md §4.2, §9 "Layout / newline sensitivity").

mod expr;

use crate::ast::{
    AccessModifier, Constructor, Datatype, Definition, Function, FunctionDefinition,
    FunctionInstanceDefinition, FunctionModifier, Import, InlineModifier, ModuleDefinition,
    TypeFunction, TypeFunctionDefinition, TypeFunctionInstanceDefinition, TypeVariable,
    TypeVariableDefinition, Variable, VariableDefinition, VariableInstanceDefinition,
};
use crate::error::{Error, ErrorKind, Errors};
use crate::lexer::{Lexer, ParserConfig};
use crate::source::{Position, Source};
use crate::token::{Keyword, Punct, Token, TokenKind};
use crate::tree::{DefinitionList, Tree};

/// Modifiers accumulated by [`ParserState::parse_modifiers`] in the
/// canonical order spec.md §4.3 allows: `private? (template(params)?)?
/// (@annot)* (inline)? (primitive)? (extern|native)?`, with `instance`
/// permitted to appear alongside `template` (spec.md §4.3 "Template
/// state").
#[derive(Debug, Clone, Default)]
struct Modifiers {
    access: AccessModifier,
    is_instance: bool,
    is_template: bool,
    inst_type_params: Option<Vec<crate::ast::TypeExpression>>,
    annotations: Vec<crate::ast::Annotation>,
    inline: InlineModifier,
    fun_mod: FunctionModifier,
    is_extern: bool,
    is_native: bool,
}

/// Top-level entry point (spec.md §6 "Public API").
pub struct Parser<'cfg> {
    config: &'cfg ParserConfig,
}

impl<'cfg> Parser<'cfg> {
    pub fn new(config: &'cfg ParserConfig) -> Self {
        Parser { config }
    }

    /// Drains every source into `tree`, appending all lexical and
    /// syntactic errors to `errors`. Always processes every source
    /// (spec.md §4.3 "Always drains all sources"); returns `true` iff
    /// `errors` is still empty afterward.
    pub fn parse(&self, sources: &[Source], tree: &mut Tree, errors: &mut Errors) -> bool {
        for source in sources {
            let (tokens, lex_errors) = Lexer::new(source.clone(), self.config).tokenize();
            errors.extend(lex_errors);
            let mut state = ParserState::new(tokens);
            let defs = state.parse_program(false);
            errors.extend(state.errors);
            tree.push_source(DefinitionList { defs });
        }
        errors.is_empty()
    }
}

/// Per-source parsing state: a flat token buffer, a cursor into it, and
/// the bracket-depth counter layout suppression reads (spec.md §4.2).
struct ParserState {
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
    errors: Errors,
}

const TOP_LEVEL_STARTERS: &[Keyword] = &[
    Keyword::Private,
    Keyword::Template,
    Keyword::Instance,
    Keyword::Module,
    Keyword::Import,
    Keyword::Datatype,
    Keyword::Unique,
    Keyword::Type,
    Keyword::Extern,
    Keyword::Native,
];

impl ParserState {
    fn new(tokens: Vec<Token>) -> Self {
        ParserState {
            tokens,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    // --- token-stream primitives --------------------------------------

    fn skip_suppressed(&mut self) {
        while self.depth > 0 {
            match self.tokens.get(self.pos) {
                Some(Token { kind: TokenKind::Newline, .. }) => self.pos += 1,
                _ => break,
            }
        }
    }

    fn cur_kind(&mut self) -> TokenKind {
        self.skip_suppressed();
        self.tokens[self.pos].kind.clone()
    }

    fn cur_pos(&mut self) -> Position {
        self.skip_suppressed();
        self.tokens[self.pos].pos.clone()
    }

    /// Lookahead that ignores bracket-depth suppression; used only to
    /// decide which definition/head alternative to take, never to
    /// consume layout-significant newlines.
    fn peek_nth_kind(&self, n: usize) -> TokenKind {
        let mut idx = self.pos;
        let mut remaining = n;
        loop {
            match self.tokens.get(idx) {
                None => return TokenKind::Eof,
                Some(Token { kind: TokenKind::Newline, .. }) if self.depth > 0 => {
                    idx += 1;
                }
                Some(tok) => {
                    if remaining == 0 {
                        return tok.kind.clone();
                    }
                    remaining -= 1;
                    idx += 1;
                }
            }
        }
    }

    fn bump(&mut self) -> Token {
        self.skip_suppressed();
        let tok = self.tokens[self.pos].clone();
        if !matches!(tok.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        match &tok.kind {
            TokenKind::Punct(Punct::LParen | Punct::LBracket | Punct::LBrace) => {
                self.depth += 1;
            }
            TokenKind::Punct(Punct::RParen | Punct::RBracket | Punct::RBrace) => {
                self.depth = self.depth.saturating_sub(1);
            }
            _ => {}
        }
        tok
    }

    fn error(&mut self, pos: Position, kind: ErrorKind) {
        self.errors.push(Error::new(pos, kind));
    }

    fn expect_punct(&mut self, p: Punct) -> Result<Position, ()> {
        if self.cur_kind() == TokenKind::Punct(p) {
            Ok(self.bump().pos)
        } else {
            let found = self.cur_kind();
            let pos = self.cur_pos();
            self.error(
                pos,
                ErrorKind::Syntax {
                    expected: format!("`{}`", crate::token::punct_text(p)),
                    found,
                },
            );
            Err(())
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Position), ()> {
        match self.cur_kind() {
            TokenKind::Ident(s) | TokenKind::UpperIdent(s) => {
                let pos = self.bump().pos;
                Ok((s, pos))
            }
            found => {
                let pos = self.cur_pos();
                self.error(
                    pos,
                    ErrorKind::Syntax {
                        expected: "identifier".to_string(),
                        found,
                    },
                );
                Err(())
            }
        }
    }

    fn skip_separators(&mut self) {
        loop {
            match self.cur_kind() {
                TokenKind::Newline | TokenKind::Punct(Punct::Semi) => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn synchronize(&mut self) {
        let resync_reason = self.errors.last().map(|e| format!("{:?}", e.kind));
        self.depth = 0;
        loop {
            match self.tokens.get(self.pos).map(|t| t.kind.clone()) {
                None | Some(TokenKind::Eof) => break,
                Some(TokenKind::Newline) => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::Punct(Punct::Semi)) => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::Keyword(k)) if TOP_LEVEL_STARTERS.contains(&k) => break,
                Some(TokenKind::Punct(Punct::At)) => break,
                _ => self.pos += 1,
            }
        }
        tracing::debug!(resync_reason = resync_reason.as_deref().unwrap_or("<none>"), "parser resynchronized");
    }

    // --- program / definition ------------------------------------------

    fn at_program_end(&mut self, nested: bool) -> bool {
        match self.cur_kind() {
            TokenKind::Eof => true,
            TokenKind::Punct(Punct::RBrace) if nested => true,
            _ => false,
        }
    }

    fn parse_program(&mut self, nested: bool) -> Vec<Definition> {
        let mut defs = Vec::new();
        self.skip_separators();
        while !self.at_program_end(nested) {
            match self.parse_definition() {
                Ok(def) => defs.push(def),
                Err(()) => self.synchronize(),
            }
            self.skip_separators();
        }
        defs
    }

    fn parse_definition(&mut self) -> Result<Definition, ()> {
        match self.cur_kind() {
            TokenKind::Keyword(Keyword::Import) => self.parse_import(),
            TokenKind::Keyword(Keyword::Module) => self.parse_module(),
            _ => self.parse_modified_definition(),
        }
    }

    fn parse_import(&mut self) -> Result<Definition, ()> {
        let kw_pos = self.bump().pos;
        let (target, _) = self.parse_qualified_path()?;
        Ok(Definition::Import(Import { target, pos: kw_pos }))
    }

    fn parse_module(&mut self) -> Result<Definition, ()> {
        self.bump();
        let (target, name_pos) = self.parse_qualified_path()?;
        self.expect_punct(Punct::LBrace)?;
        let body = self.parse_program(true);
        self.expect_punct(Punct::RBrace)?;
        Ok(Definition::ModuleDefinition(ModuleDefinition {
            target,
            body,
            pos: name_pos,
        }))
    }

    // --- modifiers -------------------------------------------------------

    fn parse_modifiers(&mut self) -> Result<Modifiers, ()> {
        let mut m = Modifiers::default();
        loop {
            match self.cur_kind() {
                TokenKind::Keyword(Keyword::Private) => {
                    if m.access == AccessModifier::Private {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("private"));
                    }
                    self.bump();
                    m.access = AccessModifier::Private;
                }
                TokenKind::Keyword(Keyword::Instance) => {
                    if m.is_instance {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("instance"));
                    }
                    self.bump();
                    m.is_instance = true;
                }
                TokenKind::Keyword(Keyword::Template) => {
                    if m.is_template {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("template"));
                    }
                    self.bump();
                    m.is_template = true;
                    if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
                        self.bump();
                        let params = self.parse_type_param_list()?;
                        self.expect_punct(Punct::RParen)?;
                        m.inst_type_params = Some(params);
                    }
                }
                TokenKind::Punct(Punct::At) => {
                    self.bump();
                    let (name, pos) = self.expect_ident()?;
                    m.annotations.push(crate::ast::Annotation { name, pos });
                }
                TokenKind::Keyword(Keyword::Inline) => {
                    if m.inline == InlineModifier::Inline {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("inline"));
                    }
                    self.bump();
                    m.inline = InlineModifier::Inline;
                }
                TokenKind::Keyword(Keyword::Primitive) => {
                    if m.fun_mod == FunctionModifier::Primitive {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("primitive"));
                    }
                    self.bump();
                    m.fun_mod = FunctionModifier::Primitive;
                }
                TokenKind::Keyword(Keyword::Extern) => {
                    if m.is_extern {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("extern"));
                    }
                    if m.is_native {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::ConflictingModifiers("extern", "native"));
                    }
                    self.bump();
                    m.is_extern = true;
                }
                TokenKind::Keyword(Keyword::Native) => {
                    if m.is_native {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::DuplicateModifier("native"));
                    }
                    if m.is_extern {
                        let pos = self.cur_pos();
                        self.error(pos, ErrorKind::ConflictingModifiers("extern", "native"));
                    }
                    self.bump();
                    m.is_native = true;
                }
                _ => break,
            }
        }
        Ok(m)
    }

    fn parse_type_param_list(&mut self) -> Result<Vec<crate::ast::TypeExpression>, ()> {
        let mut params = Vec::new();
        if self.cur_kind() == TokenKind::Punct(Punct::RParen) {
            return Ok(params);
        }
        loop {
            let (name, pos) = self.expect_ident()?;
            params.push(crate::ast::TypeExpression::TypeParameterExpression { name, pos });
            if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(params)
    }

    // --- variable / function / type definitions --------------------------

    fn parse_modified_definition(&mut self) -> Result<Definition, ()> {
        let m = self.parse_modifiers()?;
        match self.cur_kind() {
            TokenKind::Keyword(Keyword::Datatype) => self.parse_type_def(m, false, false),
            TokenKind::Keyword(Keyword::Unique) => {
                self.bump();
                self.parse_type_def(m, false, true)
            }
            TokenKind::Keyword(Keyword::Type) => self.parse_type_def(m, true, false),
            _ => self.parse_var_or_fun_def(m),
        }
    }

    fn parse_type_def(&mut self, m: Modifiers, is_synonym: bool, is_unique: bool) -> Result<Definition, ()> {
        self.bump(); // 'datatype' or 'type'
        let (name, pos) = self.expect_ident()?;
        if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
            self.bump();
            let params = self.parse_ident_list()?;
            self.expect_punct(Punct::RParen)?;
            self.expect_punct(Punct::Equals)?;
            let type_function = if is_synonym {
                TypeFunction::TypeSynonymFunction {
                    args: params,
                    body: Some(self.parse_type_expr()?),
                }
            } else {
                let constrs = self.parse_constructor_list()?;
                TypeFunction::DatatypeFunction {
                    args: params,
                    datatype: wrap_datatype(is_unique, constrs),
                }
            };
            let def = TypeFunctionDefinition {
                ident: name,
                pos: pos.clone(),
                access: m.access,
                is_template: m.is_template,
                inst_type_params: m.inst_type_params.clone(),
                type_function,
            };
            if m.is_instance {
                Ok(Definition::TypeFunctionInstanceDefinition(TypeFunctionInstanceDefinition {
                    pos,
                    definition: def,
                }))
            } else {
                Ok(Definition::TypeFunctionDefinition(def))
            }
        } else {
            self.expect_punct(Punct::Equals)?;
            let type_variable = if is_synonym {
                TypeVariable::TypeSynonymVariable {
                    expr: self.parse_type_expr()?,
                }
            } else {
                let constrs = self.parse_constructor_list()?;
                TypeVariable::DatatypeVariable {
                    datatype: wrap_datatype(is_unique, constrs),
                }
            };
            Ok(Definition::TypeVariableDefinition(TypeVariableDefinition {
                ident: name,
                pos,
                access: m.access,
                is_template: m.is_template,
                inst_type_params: m.inst_type_params.clone(),
                type_variable,
            }))
        }
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>, ()> {
        let mut names = Vec::new();
        if self.cur_kind() == TokenKind::Punct(Punct::RParen) {
            return Ok(names);
        }
        loop {
            let (name, _) = self.expect_ident()?;
            names.push(name);
            if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(names)
    }

    fn parse_constructor_list(&mut self) -> Result<Vec<Constructor>, ()> {
        let mut out = Vec::new();
        loop {
            let mut access = AccessModifier::None;
            let mut inline = InlineModifier::None;
            let mut annotations = Vec::new();
            loop {
                match self.cur_kind() {
                    TokenKind::Keyword(Keyword::Private) => {
                        self.bump();
                        access = AccessModifier::Private;
                    }
                    TokenKind::Keyword(Keyword::Inline) => {
                        self.bump();
                        inline = InlineModifier::Inline;
                    }
                    TokenKind::Punct(Punct::At) => {
                        self.bump();
                        let (name, pos) = self.expect_ident()?;
                        annotations.push(crate::ast::Annotation { name, pos });
                    }
                    _ => break,
                }
            }
            let (name, pos) = self.expect_ident()?;
            if self.cur_kind() == TokenKind::Punct(Punct::LParen) {
                self.bump();
                let mut field_types = Vec::new();
                if self.cur_kind() != TokenKind::Punct(Punct::RParen) {
                    loop {
                        field_types.push(self.parse_type_expr()?);
                        if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                            self.bump();
                        } else {
                            break;
                        }
                    }
                }
                self.expect_punct(Punct::RParen)?;
                out.push(Constructor::UnnamedFieldConstructor {
                    ident: name,
                    field_types,
                    annotations,
                    access,
                    inline,
                    pos,
                });
            } else if self.cur_kind() == TokenKind::Punct(Punct::LBrace) {
                self.bump();
                let mut fields = Vec::new();
                if self.cur_kind() != TokenKind::Punct(Punct::RBrace) {
                    loop {
                        let (field_name, _) = self.expect_ident()?;
                        self.expect_punct(Punct::Colon)?;
                        let ty = self.parse_type_expr()?;
                        fields.push((field_name, ty));
                        if self.cur_kind() == TokenKind::Punct(Punct::Comma) {
                            self.bump();
                        } else {
                            break;
                        }
                    }
                }
                self.expect_punct(Punct::RBrace)?;
                out.push(Constructor::NamedFieldConstructor {
                    ident: name,
                    fields,
                    annotations,
                    access,
                    inline,
                    pos,
                });
            } else {
                out.push(Constructor::UnnamedFieldConstructor {
                    ident: name,
                    field_types: Vec::new(),
                    annotations,
                    access,
                    inline,
                    pos,
                });
            }
            if self.cur_kind() == TokenKind::OperatorIdent("|".to_string()) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(out)
    }

    fn parse_var_or_fun_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        if m.is_native {
            return self.parse_native_fun_def(m);
        }
        if m.is_extern {
            return self.parse_extern_def(m);
        }
        match self.cur_kind() {
            TokenKind::OperatorIdent(_) | TokenKind::Punct(Punct::LParen) => self.parse_plain_fun_def(m),
            TokenKind::Ident(_) => {
                let next = self.peek_nth_kind(1);
                if next == TokenKind::Punct(Punct::LParen) || matches!(next, TokenKind::OperatorIdent(_)) {
                    self.parse_plain_fun_def(m)
                } else {
                    self.parse_plain_var_def(m)
                }
            }
            found => {
                let pos = self.cur_pos();
                self.error(
                    pos,
                    ErrorKind::Syntax {
                        expected: "a definition".to_string(),
                        found,
                    },
                );
                Err(())
            }
        }
    }

    fn finish_var_def(&mut self, m: &Modifiers, ident: String, pos: Position, variable: Variable) -> Definition {
        let vd = VariableDefinition {
            ident,
            pos: pos.clone(),
            access: m.access,
            is_template: m.is_template,
            inst_type_params: m.inst_type_params.clone(),
            variable,
        };
        if m.is_instance {
            Definition::VariableInstanceDefinition(VariableInstanceDefinition { pos, definition: vd })
        } else {
            Definition::VariableDefinition(vd)
        }
    }

    fn finish_fun_def(
        &mut self,
        m: &Modifiers,
        ident: String,
        pos: Position,
        function: Function,
    ) -> Definition {
        let fd = FunctionDefinition {
            ident,
            pos: pos.clone(),
            access: m.access,
            annotations: m.annotations.clone(),
            is_template: m.is_template,
            inst_type_params: m.inst_type_params.clone(),
            inline: m.inline,
            modifier: m.fun_mod,
            function,
        };
        if m.is_instance {
            Definition::FunctionInstanceDefinition(FunctionInstanceDefinition { pos, definition: fd })
        } else {
            Definition::FunctionDefinition(fd)
        }
    }

    fn parse_plain_var_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        let (name, pos) = self.expect_ident()?;
        let type_expr = if self.cur_kind() == TokenKind::Punct(Punct::Colon) {
            self.bump();
            Some(self.parse_type_expr()?)
        } else {
            None
        };
        let value = if self.cur_kind() == TokenKind::Punct(Punct::Equals) {
            self.bump();
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let variable = Variable::UserDefinedVariable { type_expr, value };
        Ok(self.finish_var_def(&m, name, pos, variable))
    }

    fn parse_plain_fun_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        let (name, args, pos) = self.parse_head()?;
        let result_type = if self.cur_kind() == TokenKind::Punct(Punct::Colon) {
            self.bump();
            Some(self.parse_type_expr()?)
        } else {
            None
        };
        let body = if self.cur_kind() == TokenKind::Punct(Punct::Equals) {
            self.bump();
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let function = Function::UserDefinedFunction { args, result_type, body };
        Ok(self.finish_fun_def(&m, name, pos, function))
    }

    fn parse_extern_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        match self.cur_kind() {
            TokenKind::OperatorIdent(_) | TokenKind::Punct(Punct::LParen) => self.parse_extern_fun_def(m),
            TokenKind::Ident(_) => {
                let next = self.peek_nth_kind(1);
                if next == TokenKind::Punct(Punct::LParen) || matches!(next, TokenKind::OperatorIdent(_)) {
                    self.parse_extern_fun_def(m)
                } else {
                    self.parse_extern_var_def(m)
                }
            }
            found => {
                let pos = self.cur_pos();
                self.error(
                    pos,
                    ErrorKind::Syntax {
                        expected: "identifier after `extern`".to_string(),
                        found,
                    },
                );
                Err(())
            }
        }
    }

    fn parse_extern_var_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        let (name, pos) = self.expect_ident()?;
        self.expect_punct(Punct::Colon)?;
        let type_expr = self.parse_type_expr()?;
        self.expect_punct(Punct::Equals)?;
        let (extern_name, _) = self.expect_ident()?;
        let variable = Variable::ExternalVariable { type_expr, extern_name };
        Ok(self.finish_var_def(&m, name, pos, variable))
    }

    fn parse_extern_fun_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        let (name, args, pos) = self.parse_head()?;
        self.expect_punct(Punct::Colon)?;
        let result_type = self.parse_type_expr()?;
        self.expect_punct(Punct::Equals)?;
        let (extern_name, _) = self.expect_ident()?;
        let function = Function::ExternalFunction { args, result_type, extern_name };
        Ok(self.finish_fun_def(&m, name, pos, function))
    }

    fn parse_native_fun_def(&mut self, m: Modifiers) -> Result<Definition, ()> {
        let (name, args, pos) = self.parse_head()?;
        self.expect_punct(Punct::Colon)?;
        let result_type = self.parse_type_expr()?;
        self.expect_punct(Punct::Equals)?;
        let (native_name, _) = self.expect_ident()?;
        let function = Function::NativeFunction { args, result_type, native_name };
        Ok(self.finish_fun_def(&m, name, pos, function))
    }
}

fn wrap_datatype(is_unique: bool, constrs: Vec<Constructor>) -> Datatype {
    if is_unique {
        Datatype::UniqueDatatype { constrs }
    } else {
        Datatype::NonUniqueDatatype { constrs }
    }
}
