//! Recursive-descent parser with Pratt-style binary expression parsing.
//!
//! The parser is permissive: errors are collected as diagnostics and
//! recovery happens at statement boundaries, so a broken region never
//! hides the rest of the file from the inference engine.

use crate::ast::*;
use crate::lexer::{Lexer, cook_string, parse_number};
use crate::token::{Token, TokenKind};
use tyin_common::{Diagnostic, Span};

pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    next_node_id: u32,
    diagnostics: Vec<Diagnostic>,
    /// `in` parses as a binary operator except in for-statement heads.
    allow_in: bool,
    /// Enclosing statement labels, for duplicate-label detection.
    label_stack: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        Parser {
            source,
            tokens,
            pos: 0,
            next_node_id: 0,
            diagnostics,
            allow_in: true,
            label_stack: Vec::new(),
        }
    }

    pub fn parse_program(mut self) -> ParseResult {
        let start = self.current().span;
        let mut body = Vec::new();
        while !self.at(TokenKind::EndOfFile) {
            let before = self.pos;
            if let Some(stmt) = self.parse_statement() {
                body.push(stmt);
            }
            if self.pos == before {
                // No progress: skip the offending token so we always terminate
                self.advance();
            }
        }
        let span = start.merge(self.current().span);
        let id = self.fresh_id();
        ParseResult {
            program: Program { id, span, body },
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::EndOfFile, |t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.at(kind) {
            return self.advance();
        }
        let token = self.current();
        self.error(format!("Expected {what}"), token.span);
        token
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    fn text(&self, token: Token) -> &'a str {
        token.span.slice(self.source)
    }

    /// True when the current token can end a statement without an
    /// explicit semicolon: `}` / EOF / a preceding line terminator.
    fn can_insert_semicolon(&self) -> bool {
        self.at(TokenKind::CloseBrace)
            || self.at(TokenKind::EndOfFile)
            || self.current().preceded_by_newline
    }

    fn eat_semicolon(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            return;
        }
        if !self.can_insert_semicolon() {
            let span = self.current().span;
            self.error("Expected ';'", span);
        }
    }

    /// Whether the current token works as an identifier (contextual
    /// keywords included).
    fn at_identifier(&self) -> bool {
        self.at(TokenKind::Identifier) || self.kind().is_contextual_keyword()
    }

    fn parse_identifier(&mut self, what: &str) -> Ident {
        if self.at_identifier() {
            let token = self.advance();
            let id = self.fresh_id();
            return Ident {
                id,
                span: token.span,
                name: self.text(token).to_string(),
            };
        }
        let token = self.current();
        self.error(format!("Expected {what}"), token.span);
        let id = self.fresh_id();
        Ident {
            id,
            span: token.span,
            name: String::new(),
        }
    }

    /// Property names accept any keyword (`obj.typeof` is legal).
    fn at_property_name(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::OpenBracket
        ) || self.kind_is_any_keyword()
    }

    fn kind_is_any_keyword(&self) -> bool {
        crate::token::keyword_kind(self.text(self.current())).is_some()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.kind() {
            TokenKind::VarKeyword => Some(Stmt::VarDecl(self.parse_var_decl(DeclKind::Var, true))),
            TokenKind::LetKeyword => Some(Stmt::VarDecl(self.parse_var_decl(DeclKind::Let, true))),
            TokenKind::ConstKeyword => {
                Some(Stmt::VarDecl(self.parse_var_decl(DeclKind::Const, true)))
            }
            TokenKind::FunctionKeyword => {
                let function = self.parse_function(false, true);
                Some(Stmt::FunctionDecl(Box::new(function)))
            }
            TokenKind::AsyncKeyword if self.peek_kind(1) == TokenKind::FunctionKeyword => {
                self.advance();
                let function = self.parse_function(true, true);
                Some(Stmt::FunctionDecl(Box::new(function)))
            }
            TokenKind::ClassKeyword => {
                let class = self.parse_class(true);
                Some(Stmt::ClassDecl(Box::new(class)))
            }
            TokenKind::IfKeyword => Some(self.parse_if()),
            TokenKind::WhileKeyword => Some(self.parse_while()),
            TokenKind::DoKeyword => Some(self.parse_do_while()),
            TokenKind::ForKeyword => Some(self.parse_for()),
            TokenKind::SwitchKeyword => Some(self.parse_switch()),
            TokenKind::TryKeyword => Some(self.parse_try()),
            TokenKind::ReturnKeyword => Some(self.parse_return()),
            TokenKind::ThrowKeyword => Some(self.parse_throw()),
            TokenKind::BreakKeyword => Some(self.parse_break()),
            TokenKind::ContinueKeyword => Some(self.parse_continue()),
            TokenKind::OpenBrace => Some(Stmt::Block(self.parse_block())),
            TokenKind::Semicolon => {
                let token = self.advance();
                let id = self.fresh_id();
                Some(Stmt::Empty(EmptyStmt {
                    id,
                    span: token.span,
                }))
            }
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::Colon => {
                Some(self.parse_labeled())
            }
            TokenKind::EndOfFile => None,
            _ => {
                if self.kind().starts_expression() {
                    Some(self.parse_expression_statement())
                } else {
                    let token = self.current();
                    self.error(
                        format!("Unexpected token '{}'", self.text(token)),
                        token.span,
                    );
                    self.recover_to_statement_boundary();
                    None
                }
            }
        }
    }

    fn recover_to_statement_boundary(&mut self) {
        while !self.at(TokenKind::EndOfFile) {
            if self.eat(TokenKind::Semicolon) {
                return;
            }
            if self.at(TokenKind::CloseBrace) || self.current().preceded_by_newline {
                return;
            }
            self.advance();
        }
    }

    fn parse_var_decl(&mut self, kind: DeclKind, with_semicolon: bool) -> VarDecl {
        let start = self.advance().span;
        let id = self.fresh_id();
        let mut declarators = Vec::new();
        loop {
            let pat = self.parse_binding_pattern();
            let pat_span = pat.span();
            let init = if self.eat(TokenKind::Equals) {
                Some(self.parse_assignment_expr())
            } else {
                None
            };
            let end = init.as_ref().map_or(pat_span, Expr::span);
            let decl_id = self.fresh_id();
            declarators.push(Declarator {
                id: decl_id,
                span: pat_span.merge(end),
                pat,
                init,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = declarators.last().map_or(start, |d| d.span);
        if with_semicolon {
            self.eat_semicolon();
        }
        VarDecl {
            id,
            span: start.merge(end),
            kind,
            declarators,
        }
    }

    fn parse_if(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        self.expect(TokenKind::OpenParen, "'(' after 'if'");
        let test = self.parse_expression();
        self.expect(TokenKind::CloseParen, "')'");
        let consequent = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        let alternate = if self.eat(TokenKind::ElseKeyword) {
            Some(self.parse_statement().unwrap_or_else(|| self.empty_stmt()))
        } else {
            None
        };
        let end = alternate
            .as_ref()
            .map_or_else(|| consequent.span(), Stmt::span);
        Stmt::If(Box::new(IfStmt {
            id,
            span: start.merge(end),
            test,
            consequent,
            alternate,
        }))
    }

    fn empty_stmt(&mut self) -> Stmt {
        let id = self.fresh_id();
        Stmt::Empty(EmptyStmt {
            id,
            span: self.current().span,
        })
    }

    fn parse_while(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        self.expect(TokenKind::OpenParen, "'(' after 'while'");
        let test = self.parse_expression();
        self.expect(TokenKind::CloseParen, "')'");
        let body = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        let span = start.merge(body.span());
        Stmt::While(Box::new(WhileStmt {
            id,
            span,
            test,
            body,
        }))
    }

    fn parse_do_while(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        let body = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        self.expect(TokenKind::WhileKeyword, "'while' after do body");
        self.expect(TokenKind::OpenParen, "'('");
        let test = self.parse_expression();
        let end = self.expect(TokenKind::CloseParen, "')'").span;
        self.eat_semicolon();
        Stmt::DoWhile(Box::new(DoWhileStmt {
            id,
            span: start.merge(end),
            body,
            test,
        }))
    }

    fn parse_for(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        self.expect(TokenKind::OpenParen, "'(' after 'for'");

        // Empty init: plain C-style loop
        if self.eat(TokenKind::Semicolon) {
            return self.parse_for_tail(id, start, None);
        }

        let head_is_decl = matches!(
            self.kind(),
            TokenKind::VarKeyword | TokenKind::LetKeyword | TokenKind::ConstKeyword
        );

        if head_is_decl {
            let kind = match self.kind() {
                TokenKind::VarKeyword => DeclKind::Var,
                TokenKind::LetKeyword => DeclKind::Let,
                _ => DeclKind::Const,
            };
            let decl = self.parse_var_decl(kind, false);
            if self.at(TokenKind::InKeyword) || self.at(TokenKind::OfKeyword) {
                return self.parse_for_in_of(id, start, ForHead::VarDecl(decl));
            }
            self.expect(TokenKind::Semicolon, "';' in for loop");
            return self.parse_for_tail(id, start, Some(ForInit::VarDecl(decl)));
        }

        let saved = std::mem::replace(&mut self.allow_in, false);
        let init = self.parse_expression();
        self.allow_in = saved;
        if self.at(TokenKind::InKeyword) || self.at(TokenKind::OfKeyword) {
            let head = match self.expr_to_pattern(init) {
                Some(pat) => ForHead::Pat(pat),
                None => {
                    let span = self.current().span;
                    self.error("Invalid for-in/for-of target", span);
                    let ident_id = self.fresh_id();
                    ForHead::Pat(Pat::Ident(Ident {
                        id: ident_id,
                        span,
                        name: String::new(),
                    }))
                }
            };
            return self.parse_for_in_of(id, start, head);
        }
        self.expect(TokenKind::Semicolon, "';' in for loop");
        self.parse_for_tail(id, start, Some(ForInit::Expr(init)))
    }

    fn parse_for_tail(&mut self, id: NodeId, start: Span, init: Option<ForInit>) -> Stmt {
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::Semicolon, "';' in for loop");
        let update = if self.at(TokenKind::CloseParen) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::CloseParen, "')'");
        let body = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        let span = start.merge(body.span());
        Stmt::For(Box::new(ForStmt {
            id,
            span,
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_for_in_of(&mut self, id: NodeId, start: Span, left: ForHead) -> Stmt {
        let is_of = self.at(TokenKind::OfKeyword);
        self.advance();
        let right = self.parse_assignment_expr();
        self.expect(TokenKind::CloseParen, "')'");
        let body = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        let span = start.merge(body.span());
        if is_of {
            Stmt::ForOf(Box::new(ForOfStmt {
                id,
                span,
                left,
                iterable: right,
                body,
            }))
        } else {
            Stmt::ForIn(Box::new(ForInStmt {
                id,
                span,
                left,
                object: right,
                body,
            }))
        }
    }

    fn parse_switch(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        self.expect(TokenKind::OpenParen, "'(' after 'switch'");
        let discriminant = self.parse_expression();
        self.expect(TokenKind::CloseParen, "')'");
        self.expect(TokenKind::OpenBrace, "'{'");
        let mut cases = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            let case_start = self.current().span;
            let case_id = self.fresh_id();
            let test = if self.eat(TokenKind::CaseKeyword) {
                let test = self.parse_expression();
                self.expect(TokenKind::Colon, "':' after case");
                Some(test)
            } else {
                self.expect(TokenKind::DefaultKeyword, "'case' or 'default'");
                self.expect(TokenKind::Colon, "':' after default");
                None
            };
            let mut body = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::CaseKeyword
                    | TokenKind::DefaultKeyword
                    | TokenKind::CloseBrace
                    | TokenKind::EndOfFile
            ) {
                let before = self.pos;
                if let Some(stmt) = self.parse_statement() {
                    body.push(stmt);
                }
                if self.pos == before {
                    self.advance();
                }
            }
            let case_end = body.last().map_or(case_start, Stmt::span);
            cases.push(SwitchCase {
                id: case_id,
                span: case_start.merge(case_end),
                test,
                body,
            });
        }
        let end = self.expect(TokenKind::CloseBrace, "'}'").span;
        Stmt::Switch(Box::new(SwitchStmt {
            id,
            span: start.merge(end),
            discriminant,
            cases,
        }))
    }

    fn parse_try(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        let block = self.parse_block();
        let handler = if self.at(TokenKind::CatchKeyword) {
            let catch_start = self.advance().span;
            let catch_id = self.fresh_id();
            let param = if self.eat(TokenKind::OpenParen) {
                let pat = self.parse_binding_pattern();
                self.expect(TokenKind::CloseParen, "')'");
                Some(pat)
            } else {
                None
            };
            let body = self.parse_block();
            let span = catch_start.merge(body.span);
            Some(CatchClause {
                id: catch_id,
                span,
                param,
                body,
            })
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::FinallyKeyword) {
            Some(self.parse_block())
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            self.error("Missing catch or finally after try", start);
        }
        let end = finalizer
            .as_ref()
            .map(|b| b.span)
            .or_else(|| handler.as_ref().map(|h| h.span))
            .unwrap_or(block.span);
        Stmt::Try(Box::new(TryStmt {
            id,
            span: start.merge(end),
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_return(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        let argument = if self.can_insert_semicolon() || self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        let end = argument.as_ref().map_or(start, Expr::span);
        self.eat_semicolon();
        Stmt::Return(ReturnStmt {
            id,
            span: start.merge(end),
            argument,
        })
    }

    fn parse_throw(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        if self.can_insert_semicolon() {
            self.error("Line break not allowed after 'throw'", start);
        }
        let argument = self.parse_expression();
        let span = start.merge(argument.span());
        self.eat_semicolon();
        Stmt::Throw(ThrowStmt { id, span, argument })
    }

    fn parse_break(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        let label = if self.at(TokenKind::Identifier) && !self.current().preceded_by_newline {
            Some(self.parse_identifier("label"))
        } else {
            None
        };
        let end = label.as_ref().map_or(start, |l| l.span);
        self.eat_semicolon();
        Stmt::Break(BreakStmt {
            id,
            span: start.merge(end),
            label,
        })
    }

    fn parse_continue(&mut self) -> Stmt {
        let start = self.advance().span;
        let id = self.fresh_id();
        let label = if self.at(TokenKind::Identifier) && !self.current().preceded_by_newline {
            Some(self.parse_identifier("label"))
        } else {
            None
        };
        let end = label.as_ref().map_or(start, |l| l.span);
        self.eat_semicolon();
        Stmt::Continue(ContinueStmt {
            id,
            span: start.merge(end),
            label,
        })
    }

    fn parse_labeled(&mut self) -> Stmt {
        let label = self.parse_identifier("label");
        let id = self.fresh_id();
        self.expect(TokenKind::Colon, "':'");
        if self.label_stack.contains(&label.name) {
            self.error(format!("Duplicate label '{}'", label.name), label.span);
        }
        self.label_stack.push(label.name.clone());
        let body = self.parse_statement().unwrap_or_else(|| self.empty_stmt());
        self.label_stack.pop();
        let span = label.span.merge(body.span());
        Stmt::Labeled(Box::new(LabeledStmt {
            id,
            span,
            label,
            body,
        }))
    }

    fn parse_block(&mut self) -> Block {
        let start = self.expect(TokenKind::OpenBrace, "'{'").span;
        let id = self.fresh_id();
        let mut body = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            let before = self.pos;
            if let Some(stmt) = self.parse_statement() {
                body.push(stmt);
            }
            if self.pos == before {
                self.advance();
            }
        }
        let end = self.expect(TokenKind::CloseBrace, "'}'").span;
        Block {
            id,
            span: start.merge(end),
            body,
        }
    }

    fn parse_expression_statement(&mut self) -> Stmt {
        let expr = self.parse_expression();
        let id = self.fresh_id();
        let span = expr.span();
        self.eat_semicolon();
        Stmt::Expr(ExprStmt { id, span, expr })
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    /// Parse a function after the `function` keyword position.
    /// `named` controls whether a name is expected (declarations).
    fn parse_function(&mut self, is_async: bool, named: bool) -> Function {
        let start = self.expect(TokenKind::FunctionKeyword, "'function'").span;
        let id = self.fresh_id();
        let is_generator = self.eat(TokenKind::Asterisk);
        let name = if self.at_identifier() {
            Some(self.parse_identifier("function name"))
        } else {
            if named {
                let span = self.current().span;
                self.error("Expected function name", span);
            }
            None
        };
        let params = self.parse_params();
        let body = self.parse_block();
        let span = start.merge(body.span);
        Function {
            id,
            span,
            name,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            is_arrow: false,
        }
    }

    fn parse_params(&mut self) -> Vec<Param> {
        self.expect(TokenKind::OpenParen, "'('");
        let mut params = Vec::new();
        while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::EndOfFile) {
            let pat = self.parse_binding_pattern_with_default();
            let id = self.fresh_id();
            params.push(Param {
                id,
                span: pat.span(),
                pat,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParen, "')'");
        params
    }

    fn parse_class(&mut self, named: bool) -> Class {
        let start = self.expect(TokenKind::ClassKeyword, "'class'").span;
        let id = self.fresh_id();
        let name = if self.at_identifier() {
            Some(self.parse_identifier("class name"))
        } else {
            if named {
                let span = self.current().span;
                self.error("Expected class name", span);
            }
            None
        };
        let super_class = if self.eat(TokenKind::ExtendsKeyword) {
            Some(self.parse_lhs_expr())
        } else {
            None
        };
        self.expect(TokenKind::OpenBrace, "'{'");
        let mut members = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            let before = self.pos;
            if let Some(member) = self.parse_class_member() {
                members.push(member);
            }
            if self.pos == before {
                self.advance();
            }
        }
        let end = self.expect(TokenKind::CloseBrace, "'}'").span;
        Class {
            id,
            span: start.merge(end),
            name,
            super_class,
            members,
        }
    }

    fn parse_class_member(&mut self) -> Option<ClassMember> {
        let start = self.current().span;
        let is_static =
            self.at(TokenKind::StaticKeyword) && self.peek_kind(1) != TokenKind::OpenParen
                && self.peek_kind(1) != TokenKind::Equals;
        if is_static {
            self.advance();
        }

        let mut is_async = false;
        if self.at(TokenKind::AsyncKeyword)
            && self.peek_kind(1) != TokenKind::OpenParen
            && self.peek_kind(1) != TokenKind::Equals
            && !self.tokens[self.pos + 1].preceded_by_newline
        {
            is_async = true;
            self.advance();
        }
        let is_generator = self.eat(TokenKind::Asterisk);

        let mut accessor = None;
        if matches!(self.kind(), TokenKind::GetKeyword | TokenKind::SetKeyword)
            && self.peek_kind(1) != TokenKind::OpenParen
            && self.peek_kind(1) != TokenKind::Equals
            && self.peek_kind(1) != TokenKind::Semicolon
            && self.peek_kind(1) != TokenKind::CloseBrace
        {
            accessor = Some(self.kind());
            self.advance();
        }

        if !self.at_property_name() {
            let span = self.current().span;
            self.error("Expected class member name", span);
            return None;
        }
        let key = self.parse_prop_key();

        if self.at(TokenKind::OpenParen) {
            let id = self.fresh_id();
            let fn_id = self.fresh_id();
            let params = self.parse_params();
            let body = self.parse_block();
            let span = start.merge(body.span);
            let kind = match accessor {
                Some(TokenKind::GetKeyword) => ClassMethodKind::Get,
                Some(TokenKind::SetKeyword) => ClassMethodKind::Set,
                _ if key.static_name() == Some("constructor") && !is_static => {
                    ClassMethodKind::Constructor
                }
                _ => ClassMethodKind::Method,
            };
            let function = Function {
                id: fn_id,
                span,
                name: None,
                params,
                body: FunctionBody::Block(body),
                is_async,
                is_generator,
                is_arrow: false,
            };
            return Some(ClassMember::Method(ClassMethod {
                id,
                span,
                key,
                kind,
                is_static,
                function: Box::new(function),
            }));
        }

        // Field: `key = value;` or bare `key;`
        let id = self.fresh_id();
        let value = if self.eat(TokenKind::Equals) {
            Some(self.parse_assignment_expr())
        } else {
            None
        };
        let end = value.as_ref().map_or_else(|| key.span(), Expr::span);
        self.eat_semicolon();
        Some(ClassMember::Field(ClassField {
            id,
            span: start.merge(end),
            key,
            is_static,
            value,
        }))
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    fn parse_binding_pattern(&mut self) -> Pat {
        match self.kind() {
            TokenKind::OpenBrace => self.parse_object_pattern(),
            TokenKind::OpenBracket => self.parse_array_pattern(),
            _ => Pat::Ident(self.parse_identifier("binding name")),
        }
    }

    fn parse_binding_pattern_with_default(&mut self) -> Pat {
        if self.at(TokenKind::DotDotDot) {
            let start = self.advance().span;
            let id = self.fresh_id();
            let pat = self.parse_binding_pattern();
            let span = start.merge(pat.span());
            return Pat::Rest(Box::new(RestPat { id, span, pat }));
        }
        let pat = self.parse_binding_pattern();
        if self.eat(TokenKind::Equals) {
            let id = self.fresh_id();
            let default = self.parse_assignment_expr();
            let span = pat.span().merge(default.span());
            return Pat::Assign(Box::new(AssignPat {
                id,
                span,
                pat,
                default,
            }));
        }
        pat
    }

    fn parse_object_pattern(&mut self) -> Pat {
        let start = self.expect(TokenKind::OpenBrace, "'{'").span;
        let id = self.fresh_id();
        let mut props = Vec::new();
        let mut rest = None;
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            if self.at(TokenKind::DotDotDot) {
                let rest_start = self.advance().span;
                let rest_id = self.fresh_id();
                let pat = self.parse_binding_pattern();
                let span = rest_start.merge(pat.span());
                rest = Some(Pat::Rest(Box::new(RestPat {
                    id: rest_id,
                    span,
                    pat,
                })));
                break;
            }
            let prop_start = self.current().span;
            let prop_id = self.fresh_id();
            let key = self.parse_prop_key();
            let (value, shorthand) = if self.eat(TokenKind::Colon) {
                (self.parse_binding_pattern(), false)
            } else {
                // Shorthand: the key doubles as the binding identifier
                let name = key.static_name().unwrap_or_default().to_string();
                let ident_id = self.fresh_id();
                (
                    Pat::Ident(Ident {
                        id: ident_id,
                        span: key.span(),
                        name,
                    }),
                    true,
                )
            };
            let value = if self.eat(TokenKind::Equals) {
                let assign_id = self.fresh_id();
                let default = self.parse_assignment_expr();
                let span = value.span().merge(default.span());
                Pat::Assign(Box::new(AssignPat {
                    id: assign_id,
                    span,
                    pat: value,
                    default,
                }))
            } else {
                value
            };
            let span = prop_start.merge(value.span());
            props.push(ObjectPatProp {
                id: prop_id,
                span,
                key,
                value,
                shorthand,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBrace, "'}'").span;
        Pat::Object(Box::new(ObjectPat {
            id,
            span: start.merge(end),
            props,
            rest,
        }))
    }

    fn parse_array_pattern(&mut self) -> Pat {
        let start = self.expect(TokenKind::OpenBracket, "'['").span;
        let id = self.fresh_id();
        let mut elements = Vec::new();
        while !self.at(TokenKind::CloseBracket) && !self.at(TokenKind::EndOfFile) {
            if self.at(TokenKind::Comma) {
                self.advance();
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_binding_pattern_with_default()));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBracket, "']'").span;
        Pat::Array(Box::new(ArrayPat {
            id,
            span: start.merge(end),
            elements,
        }))
    }

    /// Convert an already-parsed expression to a destructuring pattern
    /// (for `[a, b] = rhs` and for-in/for-of heads). Returns `None` for
    /// expressions that are not valid patterns.
    fn expr_to_pattern(&mut self, expr: Expr) -> Option<Pat> {
        match expr {
            Expr::Ident(ident) => Some(Pat::Ident(ident)),
            Expr::Array(array) => {
                let mut elements = Vec::new();
                for element in array.elements {
                    match element {
                        None => elements.push(None),
                        Some(ArrayElement::Expr(e)) => elements.push(Some(self.expr_to_pattern(e)?)),
                        Some(ArrayElement::Spread(spread)) => {
                            let pat = self.expr_to_pattern(spread.argument)?;
                            elements.push(Some(Pat::Rest(Box::new(RestPat {
                                id: spread.id,
                                span: spread.span,
                                pat,
                            }))));
                        }
                    }
                }
                Some(Pat::Array(Box::new(ArrayPat {
                    id: array.id,
                    span: array.span,
                    elements,
                })))
            }
            Expr::Object(object) => {
                let mut props = Vec::new();
                let mut rest = None;
                for property in object.properties {
                    match property {
                        ObjectProperty::KeyValue {
                            id,
                            span,
                            key,
                            value,
                        } => {
                            let value = self.expr_to_pattern(value)?;
                            props.push(ObjectPatProp {
                                id,
                                span,
                                key,
                                value,
                                shorthand: false,
                            });
                        }
                        ObjectProperty::Shorthand(ident) => {
                            let span = ident.span;
                            let prop_id = self.fresh_id();
                            props.push(ObjectPatProp {
                                id: prop_id,
                                span,
                                key: PropKey::Ident(ident.clone()),
                                value: Pat::Ident(ident),
                                shorthand: true,
                            });
                        }
                        ObjectProperty::Spread(spread) => {
                            let pat = self.expr_to_pattern(spread.argument)?;
                            rest = Some(Pat::Rest(Box::new(RestPat {
                                id: spread.id,
                                span: spread.span,
                                pat,
                            })));
                        }
                        ObjectProperty::Method { .. } => return None,
                    }
                }
                Some(Pat::Object(Box::new(ObjectPat {
                    id: object.id,
                    span: object.span,
                    props,
                    rest,
                })))
            }
            Expr::Assign(assign) if assign.op == AssignOp::Assign => {
                let AssignExpr {
                    id,
                    span,
                    target,
                    value,
                    ..
                } = *assign;
                let pat = match target {
                    AssignTarget::Ident(ident) => Pat::Ident(ident),
                    AssignTarget::Pattern(pat) => *pat,
                    _ => return None,
                };
                Some(Pat::Assign(Box::new(AssignPat {
                    id,
                    span,
                    pat,
                    default: value,
                })))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Full expression including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> Expr {
        let first = self.parse_assignment_expr();
        if !self.at(TokenKind::Comma) {
            return first;
        }
        let id = self.fresh_id();
        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_assignment_expr());
        }
        let span = exprs[0].span().merge(exprs[exprs.len() - 1].span());
        Expr::Seq(Box::new(SeqExpr { id, span, exprs }))
    }

    fn parse_assignment_expr(&mut self) -> Expr {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }

        if self.at(TokenKind::YieldKeyword) {
            return self.parse_yield();
        }

        let left = self.parse_conditional_expr();
        if !self.kind().is_assignment_operator() {
            return left;
        }

        let op = match self.kind() {
            TokenKind::Equals => AssignOp::Assign,
            TokenKind::PlusEquals => AssignOp::Add,
            TokenKind::MinusEquals => AssignOp::Sub,
            TokenKind::AsteriskEquals => AssignOp::Mul,
            TokenKind::SlashEquals => AssignOp::Div,
            TokenKind::PercentEquals => AssignOp::Rem,
            TokenKind::AsteriskAsteriskEquals => AssignOp::Exp,
            TokenKind::AmpersandEquals => AssignOp::BitAnd,
            TokenKind::BarEquals => AssignOp::BitOr,
            TokenKind::CaretEquals => AssignOp::BitXor,
            TokenKind::LessThanLessThanEquals => AssignOp::Shl,
            TokenKind::GreaterThanGreaterThanEquals => AssignOp::Shr,
            TokenKind::GreaterThanGreaterThanGreaterThanEquals => AssignOp::UShr,
            TokenKind::AmpersandAmpersandEquals => AssignOp::AndAssign,
            TokenKind::BarBarEquals => AssignOp::OrAssign,
            _ => AssignOp::NullishAssign,
        };
        self.advance();

        let target = match left {
            Expr::Ident(ident) => AssignTarget::Ident(ident),
            Expr::Member(member) => AssignTarget::Member(member),
            Expr::Index(index) => AssignTarget::Index(index),
            other if op == AssignOp::Assign => {
                let span = other.span();
                match self.expr_to_pattern(other) {
                    Some(pat) => AssignTarget::Pattern(Box::new(pat)),
                    None => {
                        self.error("Invalid assignment target", span);
                        let ident_id = self.fresh_id();
                        AssignTarget::Ident(Ident {
                            id: ident_id,
                            span,
                            name: String::new(),
                        })
                    }
                }
            }
            other => {
                let span = other.span();
                self.error("Invalid assignment target", span);
                let ident_id = self.fresh_id();
                AssignTarget::Ident(Ident {
                    id: ident_id,
                    span,
                    name: String::new(),
                })
            }
        };

        let id = self.fresh_id();
        let value = self.parse_assignment_expr();
        let span = target.span().merge(value.span());
        Expr::Assign(Box::new(AssignExpr {
            id,
            span,
            op,
            target,
            value,
        }))
    }

    fn parse_yield(&mut self) -> Expr {
        let start = self.advance().span;
        let id = self.fresh_id();
        let delegate = self.eat(TokenKind::Asterisk);
        let argument = if self.kind().starts_expression() && !self.current().preceded_by_newline {
            Some(self.parse_assignment_expr())
        } else {
            None
        };
        let end = argument.as_ref().map_or(start, Expr::span);
        Expr::Yield(Box::new(YieldExpr {
            id,
            span: start.merge(end),
            argument,
            delegate,
        }))
    }

    /// Detect and parse arrow functions: `x => e`, `(a, b) => e`,
    /// `async x => e`, `async (a) => e`.
    fn try_parse_arrow_function(&mut self) -> Option<Expr> {
        let is_async = self.at(TokenKind::AsyncKeyword)
            && !self.tokens[self.pos + 1].preceded_by_newline
            && matches!(
                self.peek_kind(1),
                TokenKind::Identifier | TokenKind::OpenParen
            );
        let offset = usize::from(is_async);

        match self.peek_kind(offset) {
            TokenKind::Identifier if self.peek_kind(offset + 1) == TokenKind::Arrow => {}
            TokenKind::OpenParen => {
                let close = self.find_matching_paren(self.pos + offset)?;
                if self.tokens.get(close + 1).map(|t| t.kind) != Some(TokenKind::Arrow) {
                    return None;
                }
            }
            _ => return None,
        }

        if is_async {
            self.advance();
        }
        let start = self.current().span;
        let id = self.fresh_id();
        let params = if self.at(TokenKind::Identifier) {
            let ident = self.parse_identifier("parameter");
            let param_id = self.fresh_id();
            vec![Param {
                id: param_id,
                span: ident.span,
                pat: Pat::Ident(ident),
            }]
        } else {
            self.parse_params()
        };
        self.expect(TokenKind::Arrow, "'=>'");
        let body = if self.at(TokenKind::OpenBrace) {
            FunctionBody::Block(self.parse_block())
        } else {
            FunctionBody::Expr(Box::new(self.parse_assignment_expr()))
        };
        let end = match &body {
            FunctionBody::Block(block) => block.span,
            FunctionBody::Expr(expr) => expr.span(),
        };
        Some(Expr::Arrow(Box::new(Function {
            id,
            span: start.merge(end),
            name: None,
            params,
            body,
            is_async,
            is_generator: false,
            is_arrow: true,
        })))
    }

    /// Index of the token with the `)` matching the `(` at `open`.
    fn find_matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::EndOfFile => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn parse_conditional_expr(&mut self) -> Expr {
        let test = self.parse_binary_expr(0);
        if !self.at(TokenKind::Question) {
            return test;
        }
        self.advance();
        let id = self.fresh_id();
        let consequent = self.parse_assignment_expr();
        self.expect(TokenKind::Colon, "':' in conditional");
        let alternate = self.parse_assignment_expr();
        let span = test.span().merge(alternate.span());
        Expr::Cond(Box::new(CondExpr {
            id,
            span,
            test,
            consequent,
            alternate,
        }))
    }

    /// Binding power for binary and logical operators. Higher binds
    /// tighter. Returns `None` for non-operators.
    fn binary_binding_power(kind: TokenKind) -> Option<(u8, BinOpKind)> {
        use TokenKind::*;
        let entry = match kind {
            QuestionQuestion => (1, BinOpKind::Logical(LogicalOp::Nullish)),
            BarBar => (2, BinOpKind::Logical(LogicalOp::Or)),
            AmpersandAmpersand => (3, BinOpKind::Logical(LogicalOp::And)),
            Bar => (4, BinOpKind::Binary(BinaryOp::BitOr)),
            Caret => (5, BinOpKind::Binary(BinaryOp::BitXor)),
            Ampersand => (6, BinOpKind::Binary(BinaryOp::BitAnd)),
            EqualsEquals => (7, BinOpKind::Binary(BinaryOp::EqEq)),
            ExclamationEquals => (7, BinOpKind::Binary(BinaryOp::NotEq)),
            EqualsEqualsEquals => (7, BinOpKind::Binary(BinaryOp::EqEqEq)),
            ExclamationEqualsEquals => (7, BinOpKind::Binary(BinaryOp::NotEqEq)),
            LessThan => (8, BinOpKind::Binary(BinaryOp::Lt)),
            GreaterThan => (8, BinOpKind::Binary(BinaryOp::Gt)),
            LessThanEquals => (8, BinOpKind::Binary(BinaryOp::Le)),
            GreaterThanEquals => (8, BinOpKind::Binary(BinaryOp::Ge)),
            InKeyword => (8, BinOpKind::Binary(BinaryOp::In)),
            InstanceofKeyword => (8, BinOpKind::Binary(BinaryOp::Instanceof)),
            LessThanLessThan => (9, BinOpKind::Binary(BinaryOp::Shl)),
            GreaterThanGreaterThan => (9, BinOpKind::Binary(BinaryOp::Shr)),
            GreaterThanGreaterThanGreaterThan => (9, BinOpKind::Binary(BinaryOp::UShr)),
            Plus => (10, BinOpKind::Binary(BinaryOp::Add)),
            Minus => (10, BinOpKind::Binary(BinaryOp::Sub)),
            Asterisk => (11, BinOpKind::Binary(BinaryOp::Mul)),
            Slash => (11, BinOpKind::Binary(BinaryOp::Div)),
            Percent => (11, BinOpKind::Binary(BinaryOp::Rem)),
            AsteriskAsterisk => (12, BinOpKind::Binary(BinaryOp::Exp)),
            _ => return None,
        };
        Some(entry)
    }

    fn parse_binary_expr(&mut self, min_bp: u8) -> Expr {
        let mut left = self.parse_unary_expr();
        while let Some((bp, op)) = Self::binary_binding_power(self.kind()) {
            if bp < min_bp {
                break;
            }
            if self.at(TokenKind::InKeyword) && !self.allow_in {
                break;
            }
            self.advance();
            // `**` is right-associative; everything else left
            let next_min = if matches!(op, BinOpKind::Binary(BinaryOp::Exp)) {
                bp
            } else {
                bp + 1
            };
            let right = self.parse_binary_expr(next_min);
            let id = self.fresh_id();
            let span = left.span().merge(right.span());
            left = match op {
                BinOpKind::Binary(op) => Expr::Binary(Box::new(BinaryExpr {
                    id,
                    span,
                    op,
                    left,
                    right,
                })),
                BinOpKind::Logical(op) => Expr::Logical(Box::new(LogicalExpr {
                    id,
                    span,
                    op,
                    left,
                    right,
                })),
            };
        }
        left
    }

    fn parse_unary_expr(&mut self) -> Expr {
        let op = match self.kind() {
            TokenKind::TypeofKeyword => Some(UnaryOp::Typeof),
            TokenKind::VoidKeyword => Some(UnaryOp::Void),
            TokenKind::DeleteKeyword => Some(UnaryOp::Delete),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::Tilde),
            TokenKind::Exclamation => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let id = self.fresh_id();
            let argument = self.parse_unary_expr();
            let span = start.merge(argument.span());
            return Expr::Unary(Box::new(UnaryExpr {
                id,
                span,
                op,
                argument,
            }));
        }

        if self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus) {
            let op = if self.at(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let start = self.advance().span;
            let id = self.fresh_id();
            let argument = self.parse_unary_expr();
            let span = start.merge(argument.span());
            return Expr::Update(Box::new(UpdateExpr {
                id,
                span,
                op,
                prefix: true,
                argument,
            }));
        }

        if self.at(TokenKind::AwaitKeyword) {
            let start = self.advance().span;
            let id = self.fresh_id();
            let argument = self.parse_unary_expr();
            let span = start.merge(argument.span());
            return Expr::Await(Box::new(AwaitExpr { id, span, argument }));
        }

        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Expr {
        let expr = self.parse_lhs_expr();
        if (self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus))
            && !self.current().preceded_by_newline
        {
            let op = if self.at(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let end = self.advance().span;
            let id = self.fresh_id();
            let span = expr.span().merge(end);
            return Expr::Update(Box::new(UpdateExpr {
                id,
                span,
                op,
                prefix: false,
                argument: expr,
            }));
        }
        expr
    }

    /// Left-hand-side expression: primary plus call/member/index chains.
    fn parse_lhs_expr(&mut self) -> Expr {
        let mut expr = if self.at(TokenKind::NewKeyword) {
            self.parse_new_expr()
        } else {
            self.parse_primary_expr()
        };

        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                    expr = self.parse_member_access(expr, false);
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    if self.at(TokenKind::OpenParen) {
                        expr = self.parse_call(expr, true);
                    } else if self.at(TokenKind::OpenBracket) {
                        expr = self.parse_index_access(expr, true);
                    } else {
                        expr = self.parse_member_access(expr, true);
                    }
                }
                TokenKind::OpenBracket => {
                    expr = self.parse_index_access(expr, false);
                }
                TokenKind::OpenParen => {
                    expr = self.parse_call(expr, false);
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_member_access(&mut self, object: Expr, optional: bool) -> Expr {
        let property = if self.at_property_name() && !self.at(TokenKind::OpenBracket) {
            let token = self.advance();
            let id = self.fresh_id();
            Ident {
                id,
                span: token.span,
                name: self.text(token).to_string(),
            }
        } else {
            self.parse_identifier("property name")
        };
        let id = self.fresh_id();
        let span = object.span().merge(property.span);
        Expr::Member(Box::new(MemberExpr {
            id,
            span,
            object,
            property,
            optional,
        }))
    }

    fn parse_index_access(&mut self, object: Expr, optional: bool) -> Expr {
        self.expect(TokenKind::OpenBracket, "'['");
        let saved = std::mem::replace(&mut self.allow_in, true);
        let index = self.parse_expression();
        self.allow_in = saved;
        let end = self.expect(TokenKind::CloseBracket, "']'").span;
        let id = self.fresh_id();
        let span = object.span().merge(end);
        Expr::Index(Box::new(IndexExpr {
            id,
            span,
            object,
            index,
            optional,
        }))
    }

    fn parse_call(&mut self, callee: Expr, optional: bool) -> Expr {
        let id = self.fresh_id();
        let (arguments, end) = self.parse_arguments();
        let span = callee.span().merge(end);
        Expr::Call(Box::new(CallExpr {
            id,
            span,
            callee,
            arguments,
            optional,
        }))
    }

    fn parse_arguments(&mut self) -> (Vec<Argument>, Span) {
        self.expect(TokenKind::OpenParen, "'('");
        let mut arguments = Vec::new();
        while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::EndOfFile) {
            if self.at(TokenKind::DotDotDot) {
                let start = self.advance().span;
                let id = self.fresh_id();
                let argument = self.parse_assignment_expr();
                let span = start.merge(argument.span());
                arguments.push(Argument::Spread(SpreadElement { id, span, argument }));
            } else {
                arguments.push(Argument::Expr(self.parse_assignment_expr()));
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseParen, "')'").span;
        (arguments, end)
    }

    fn parse_new_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::NewKeyword, "'new'").span;
        let id = self.fresh_id();

        // Member chain binds tighter than the `new` arguments
        let mut callee = if self.at(TokenKind::NewKeyword) {
            self.parse_new_expr()
        } else {
            self.parse_primary_expr()
        };
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                    callee = self.parse_member_access(callee, false);
                }
                TokenKind::OpenBracket => {
                    callee = self.parse_index_access(callee, false);
                }
                _ => break,
            }
        }

        let (arguments, end) = if self.at(TokenKind::OpenParen) {
            self.parse_arguments()
        } else {
            (Vec::new(), callee.span())
        };
        Expr::New(Box::new(NewExpr {
            id,
            span: start.merge(end),
            callee,
            arguments,
        }))
    }

    fn parse_primary_expr(&mut self) -> Expr {
        match self.kind() {
            TokenKind::NumberLiteral => {
                let token = self.advance();
                let id = self.fresh_id();
                Expr::Number(NumberLit {
                    id,
                    span: token.span,
                    value: parse_number(self.text(token)),
                })
            }
            TokenKind::BigIntLiteral => {
                let token = self.advance();
                let id = self.fresh_id();
                let raw = self.text(token);
                Expr::BigInt(BigIntLit {
                    id,
                    span: token.span,
                    value: raw.strip_suffix('n').unwrap_or(raw).to_string(),
                })
            }
            TokenKind::StringLiteral | TokenKind::TemplateLiteral => {
                let token = self.advance();
                let id = self.fresh_id();
                Expr::String(StringLit {
                    id,
                    span: token.span,
                    value: cook_string(self.text(token)),
                })
            }
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => {
                let value = self.at(TokenKind::TrueKeyword);
                let token = self.advance();
                let id = self.fresh_id();
                Expr::Boolean(BoolLit {
                    id,
                    span: token.span,
                    value,
                })
            }
            TokenKind::NullKeyword => {
                let token = self.advance();
                let id = self.fresh_id();
                Expr::Null(NullLit {
                    id,
                    span: token.span,
                })
            }
            TokenKind::UndefinedKeyword => {
                let token = self.advance();
                let id = self.fresh_id();
                Expr::Undefined(UndefinedLit {
                    id,
                    span: token.span,
                })
            }
            TokenKind::ThisKeyword => {
                let token = self.advance();
                let id = self.fresh_id();
                Expr::This(ThisExpr {
                    id,
                    span: token.span,
                })
            }
            TokenKind::OpenParen => {
                self.advance();
                let saved = std::mem::replace(&mut self.allow_in, true);
                let expr = self.parse_expression();
                self.allow_in = saved;
                self.expect(TokenKind::CloseParen, "')'");
                expr
            }
            TokenKind::OpenBracket => self.parse_array_literal(),
            TokenKind::OpenBrace => self.parse_object_literal(),
            TokenKind::FunctionKeyword => {
                let function = self.parse_function(false, false);
                Expr::Function(Box::new(function))
            }
            TokenKind::AsyncKeyword if self.peek_kind(1) == TokenKind::FunctionKeyword => {
                self.advance();
                let function = self.parse_function(true, false);
                Expr::Function(Box::new(function))
            }
            TokenKind::ClassKeyword => {
                let class = self.parse_class(false);
                Expr::Class(Box::new(class))
            }
            _ if self.at_identifier() => Expr::Ident(self.parse_identifier("expression")),
            _ => {
                let token = self.current();
                self.error(
                    format!("Unexpected token '{}'", self.text(token)),
                    token.span,
                );
                self.advance();
                let id = self.fresh_id();
                Expr::Undefined(UndefinedLit {
                    id,
                    span: token.span,
                })
            }
        }
    }

    fn parse_array_literal(&mut self) -> Expr {
        let start = self.expect(TokenKind::OpenBracket, "'['").span;
        let id = self.fresh_id();
        let mut elements = Vec::new();
        while !self.at(TokenKind::CloseBracket) && !self.at(TokenKind::EndOfFile) {
            if self.at(TokenKind::Comma) {
                self.advance();
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                let spread_start = self.advance().span;
                let spread_id = self.fresh_id();
                let argument = self.parse_assignment_expr();
                let span = spread_start.merge(argument.span());
                elements.push(Some(ArrayElement::Spread(SpreadElement {
                    id: spread_id,
                    span,
                    argument,
                })));
            } else {
                elements.push(Some(ArrayElement::Expr(self.parse_assignment_expr())));
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBracket, "']'").span;
        Expr::Array(Box::new(ArrayLit {
            id,
            span: start.merge(end),
            elements,
        }))
    }

    fn parse_prop_key(&mut self) -> PropKey {
        match self.kind() {
            TokenKind::StringLiteral => {
                let token = self.advance();
                let id = self.fresh_id();
                PropKey::String(StringLit {
                    id,
                    span: token.span,
                    value: cook_string(self.text(token)),
                })
            }
            TokenKind::NumberLiteral => {
                let token = self.advance();
                let id = self.fresh_id();
                PropKey::Number(NumberLit {
                    id,
                    span: token.span,
                    value: parse_number(self.text(token)),
                })
            }
            TokenKind::OpenBracket => {
                self.advance();
                let expr = self.parse_assignment_expr();
                self.expect(TokenKind::CloseBracket, "']'");
                PropKey::Computed(Box::new(expr))
            }
            _ => {
                // Identifier or any keyword used as a property name
                if self.at(TokenKind::Identifier) || self.kind_is_any_keyword() {
                    let token = self.advance();
                    let id = self.fresh_id();
                    PropKey::Ident(Ident {
                        id,
                        span: token.span,
                        name: self.text(token).to_string(),
                    })
                } else {
                    PropKey::Ident(self.parse_identifier("property name"))
                }
            }
        }
    }

    fn parse_object_literal(&mut self) -> Expr {
        let start = self.expect(TokenKind::OpenBrace, "'{'").span;
        let id = self.fresh_id();
        let mut properties = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            properties.push(self.parse_object_property());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBrace, "'}'").span;
        Expr::Object(Box::new(ObjectLit {
            id,
            span: start.merge(end),
            properties,
        }))
    }

    fn parse_object_property(&mut self) -> ObjectProperty {
        if self.at(TokenKind::DotDotDot) {
            let start = self.advance().span;
            let id = self.fresh_id();
            let argument = self.parse_assignment_expr();
            let span = start.merge(argument.span());
            return ObjectProperty::Spread(SpreadElement { id, span, argument });
        }

        let start = self.current().span;

        let mut is_async = false;
        if self.at(TokenKind::AsyncKeyword)
            && !matches!(
                self.peek_kind(1),
                TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::CloseBrace
                    | TokenKind::OpenParen
                    | TokenKind::Equals
            )
        {
            is_async = true;
            self.advance();
        }
        let is_generator = self.eat(TokenKind::Asterisk);

        let mut accessor = None;
        if matches!(self.kind(), TokenKind::GetKeyword | TokenKind::SetKeyword)
            && !matches!(
                self.peek_kind(1),
                TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::CloseBrace
                    | TokenKind::OpenParen
                    | TokenKind::Equals
            )
        {
            accessor = Some(self.kind());
            self.advance();
        }

        let key = self.parse_prop_key();

        if self.at(TokenKind::OpenParen) {
            let id = self.fresh_id();
            let fn_id = self.fresh_id();
            let params = self.parse_params();
            let body = self.parse_block();
            let span = start.merge(body.span);
            let kind = match accessor {
                Some(TokenKind::GetKeyword) => MethodKind::Get,
                Some(TokenKind::SetKeyword) => MethodKind::Set,
                _ => MethodKind::Method,
            };
            let function = Function {
                id: fn_id,
                span,
                name: None,
                params,
                body: FunctionBody::Block(body),
                is_async,
                is_generator,
                is_arrow: false,
            };
            return ObjectProperty::Method {
                id,
                span,
                key,
                kind,
                function: Box::new(function),
            };
        }

        if self.eat(TokenKind::Colon) {
            let id = self.fresh_id();
            let value = self.parse_assignment_expr();
            let span = start.merge(value.span());
            return ObjectProperty::KeyValue {
                id,
                span,
                key,
                value,
            };
        }

        // Shorthand `{ x }`
        match key {
            PropKey::Ident(ident) => ObjectProperty::Shorthand(ident),
            other => {
                let span = other.span();
                self.error("Expected ':' after property name", span);
                let id = self.fresh_id();
                let value_id = self.fresh_id();
                ObjectProperty::KeyValue {
                    id,
                    span,
                    key: other,
                    value: Expr::Undefined(UndefinedLit { id: value_id, span }),
                }
            }
        }
    }
}

/// Kind of infix operator, used by the Pratt loop.
#[derive(Clone, Copy)]
enum BinOpKind {
    Binary(BinaryOp),
    Logical(LogicalOp),
}
