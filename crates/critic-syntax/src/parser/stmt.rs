//! Statement parsing

use super::{decl, expr, recovery, types, ParseError, Parser};
use crate::ast::*;
use crate::token::{Span, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

pub fn parse_block(parser: &mut Parser) -> Result<Block, ParseError> {
    let start = parser.expect(Token::LBrace)?;
    let stmts = parse_stmt_list(parser);
    parser.expect(Token::RBrace)?;
    Ok(Block {
        stmts,
        span: parser.span_from(start),
    })
}

/// Statements up to the closing `}` or the next `case`/`default`.
///
/// Errors are recorded and parsing resumes at the next statement.
fn parse_stmt_list(parser: &mut Parser) -> Vec<Stmt> {
    let mut stmts = Vec::new();
    while !matches!(
        parser.current(),
        Token::RBrace | Token::Case | Token::Default | Token::Eof
    ) {
        let before = parser.pos;
        let result = parse_stmt(parser).and_then(|stmt| {
            if !matches!(parser.current(), Token::RBrace | Token::Case | Token::Default) {
                parser.expect_semi()?;
            }
            Ok(stmt)
        });
        match result {
            Ok(Stmt::Empty(_)) => {}
            Ok(stmt) => stmts.push(stmt),
            Err(err) => {
                parser.record(err);
                recovery::sync_to_stmt(parser);
                if parser.pos == before {
                    parser.advance();
                }
            }
        }
    }
    stmts
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.current_span();
    match parser.current() {
        Token::Const | Token::Var | Token::Type => {
            Ok(Stmt::Decl(decl::parse_gen_decl(parser)?))
        }
        Token::Go => {
            parser.advance();
            let call = expr::parse_expr(parser)?;
            Ok(Stmt::Go(GoStmt {
                call,
                span: parser.span_from(start),
            }))
        }
        Token::Defer => {
            parser.advance();
            let call = expr::parse_expr(parser)?;
            Ok(Stmt::Defer(DeferStmt {
                call,
                span: parser.span_from(start),
            }))
        }
        Token::Return => {
            parser.advance();
            let results = if matches!(parser.current(), Token::Semicolon | Token::RBrace) {
                Vec::new()
            } else {
                expr::parse_expr_list(parser)?
            };
            Ok(Stmt::Return(ReturnStmt {
                results,
                span: parser.span_from(start),
            }))
        }
        Token::Break | Token::Continue | Token::Goto | Token::Fallthrough => {
            let kind = match parser.advance() {
                Token::Break => BranchKind::Break,
                Token::Continue => BranchKind::Continue,
                Token::Goto => BranchKind::Goto,
                _ => BranchKind::Fallthrough,
            };
            let label = if kind != BranchKind::Fallthrough
                && matches!(parser.current(), Token::Ident(_))
            {
                Some(parser.parse_ident()?)
            } else {
                None
            };
            Ok(Stmt::Branch(BranchStmt {
                kind,
                label,
                span: parser.span_from(start),
            }))
        }
        Token::LBrace => Ok(Stmt::Block(parse_block(parser)?)),
        Token::If => parse_if(parser),
        Token::Switch => parse_switch(parser),
        Token::For => parse_for(parser),
        Token::Semicolon | Token::RBrace => Ok(Stmt::Empty(Span::new(
            start.start,
            start.start,
            start.line,
            start.column,
        ))),
        Token::Select => Err(ParseError::invalid_syntax(
            "select statements are not supported",
            start,
        )),
        _ => parse_simple_stmt(parser, SimpleMode::LabelOk),
    }
}

fn parse_simple_stmt(parser: &mut Parser, mode: SimpleMode) -> Result<Stmt, ParseError> {
    let start = parser.current_span();

    if mode == SimpleMode::RangeOk && parser.check(&Token::Range) {
        parser.advance();
        let x = expr::parse_expr(parser)?;
        return Ok(range_stub(None, None, false, x, parser.span_from(start)));
    }

    let mut lhs = expr::parse_expr_list(parser)?;

    let tok = match parser.current() {
        Token::Assign => Some(AssignOp::Assign),
        Token::Define => Some(AssignOp::Define),
        Token::PlusAssign => Some(AssignOp::Add),
        Token::MinusAssign => Some(AssignOp::Sub),
        Token::StarAssign => Some(AssignOp::Mul),
        Token::SlashAssign => Some(AssignOp::Quo),
        Token::PercentAssign => Some(AssignOp::Rem),
        Token::AmpAssign => Some(AssignOp::And),
        Token::PipeAssign => Some(AssignOp::Or),
        Token::CaretAssign => Some(AssignOp::Xor),
        Token::ShlAssign => Some(AssignOp::Shl),
        Token::ShrAssign => Some(AssignOp::Shr),
        Token::AndNotAssign => Some(AssignOp::AndNot),
        _ => None,
    };

    if let Some(tok) = tok {
        parser.advance();
        let plain = matches!(tok, AssignOp::Assign | AssignOp::Define);
        if mode == SimpleMode::RangeOk && plain && parser.check(&Token::Range) {
            parser.advance();
            let x = expr::parse_expr(parser)?;
            if lhs.len() > 2 {
                return Err(ParseError::invalid_syntax(
                    "range clause permits at most two iteration variables",
                    start,
                ));
            }
            let mut vars = lhs.into_iter();
            let key = vars.next();
            let value = vars.next();
            return Ok(range_stub(
                key,
                value,
                tok == AssignOp::Define,
                x,
                parser.span_from(start),
            ));
        }
        let rhs = expr::parse_expr_list(parser)?;
        return Ok(Stmt::Assign(AssignStmt {
            lhs,
            tok,
            rhs,
            span: parser.span_from(start),
        }));
    }

    if lhs.len() > 1 {
        return Err(parser.unexpected(&[Token::Assign, Token::Define]));
    }
    let Some(x) = lhs.pop() else {
        return Err(parser.unexpected(&[Token::Ident(String::new())]));
    };

    let next = parser.current().clone();
    match (next, x) {
        (Token::Colon, Expr::Ident(label)) if mode == SimpleMode::LabelOk => {
            parser.advance();
            let stmt = if matches!(parser.current(), Token::RBrace) {
                Stmt::Empty(parser.current_span())
            } else {
                parse_stmt(parser)?
            };
            Ok(Stmt::Labeled(LabeledStmt {
                label,
                stmt: Box::new(stmt),
                span: parser.span_from(start),
            }))
        }
        (Token::Arrow, x) => {
            parser.advance();
            let value = expr::parse_expr(parser)?;
            Ok(Stmt::Send(SendStmt {
                chan: x,
                value,
                span: parser.span_from(start),
            }))
        }
        (Token::Inc | Token::Dec, x) => {
            let inc = matches!(parser.advance(), Token::Inc);
            Ok(Stmt::IncDec(IncDecStmt {
                x,
                inc,
                span: parser.span_from(start),
            }))
        }
        (_, x) => Ok(Stmt::Expr(ExprStmt {
            x,
            span: parser.span_from(start),
        })),
    }
}

/// A range clause without a body; `parse_for` fills the body in.
fn range_stub(key: Option<Expr>, value: Option<Expr>, define: bool, x: Expr, span: Span) -> Stmt {
    Stmt::Range(RangeStmt {
        key,
        value,
        define,
        x,
        body: Block {
            stmts: Vec::new(),
            span,
        },
        span,
    })
}

fn into_cond(stmt: Stmt) -> Result<Expr, ParseError> {
    match stmt {
        Stmt::Expr(expr) => Ok(expr.x),
        other => Err(ParseError::invalid_syntax(
            "expected boolean expression",
            other.span(),
        )),
    }
}

/// `[init;] cond`, parsed with composite literals of named types disabled.
fn parse_if_header(parser: &mut Parser) -> Result<(Option<Box<Stmt>>, Expr), ParseError> {
    let first = parse_simple_stmt(parser, SimpleMode::Basic)?;
    if parser.eat(&Token::Semicolon) {
        let cond = expr::parse_expr(parser)?;
        Ok((Some(Box::new(first)), cond))
    } else {
        Ok((None, into_cond(first)?))
    }
}

fn parse_if(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.expect(Token::If)?;
    let outer = parser.expr_level;
    parser.expr_level = -1;
    let header = parse_if_header(parser);
    parser.expr_level = outer;
    let (init, cond) = header?;

    let body = parse_block(parser)?;
    let else_branch = if parser.eat(&Token::Else) {
        match parser.current() {
            Token::If => Some(Box::new(parse_if(parser)?)),
            Token::LBrace => Some(Box::new(Stmt::Block(parse_block(parser)?))),
            _ => return Err(parser.unexpected(&[Token::If, Token::LBrace])),
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        init,
        cond,
        body,
        else_branch,
        span: parser.span_from(start),
    }))
}

type SwitchHeader = (Option<Box<Stmt>>, Option<Stmt>);

fn parse_switch_header(parser: &mut Parser) -> Result<SwitchHeader, ParseError> {
    let mut init = None;
    let mut tag = None;
    if !parser.check(&Token::LBrace) {
        if !parser.check(&Token::Semicolon) {
            tag = Some(parse_simple_stmt(parser, SimpleMode::Basic)?);
        }
        if parser.eat(&Token::Semicolon) {
            init = tag.take().map(Box::new);
            if !parser.check(&Token::LBrace) {
                tag = Some(parse_simple_stmt(parser, SimpleMode::Basic)?);
            }
        }
    }
    Ok((init, tag))
}

fn parse_switch(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.expect(Token::Switch)?;
    let outer = parser.expr_level;
    parser.expr_level = -1;
    let header = parse_switch_header(parser);
    parser.expr_level = outer;
    let (init, tag) = header?;

    if let Some((binding, guard)) = tag.as_ref().and_then(type_switch_guard) {
        parser.expect(Token::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(parser.current(), Token::Case | Token::Default) {
            clauses.push(parse_type_case_clause(parser)?);
        }
        parser.expect(Token::RBrace)?;
        return Ok(Stmt::TypeSwitch(TypeSwitchStmt {
            init,
            binding,
            guard,
            clauses,
            span: parser.span_from(start),
        }));
    }

    let tag = tag.map(into_cond).transpose()?;
    parser.expect(Token::LBrace)?;
    let mut clauses = Vec::new();
    while matches!(parser.current(), Token::Case | Token::Default) {
        clauses.push(parse_case_clause(parser)?);
    }
    parser.expect(Token::RBrace)?;
    Ok(Stmt::Switch(SwitchStmt {
        init,
        tag,
        clauses,
        span: parser.span_from(start),
    }))
}

/// `x.(type)` or `v := x.(type)`.
fn type_switch_guard(stmt: &Stmt) -> Option<(Option<Ident>, Expr)> {
    let is_guard = |expr: &Expr| matches!(expr, Expr::TypeAssert(TypeAssertExpr { ty: None, .. }));
    match stmt {
        Stmt::Expr(s) if is_guard(&s.x) => Some((None, s.x.clone())),
        Stmt::Assign(s)
            if s.tok == AssignOp::Define
                && s.lhs.len() == 1
                && s.rhs.len() == 1
                && is_guard(&s.rhs[0]) =>
        {
            let binding = s.lhs[0].as_ident()?.clone();
            Some((Some(binding), s.rhs[0].clone()))
        }
        _ => None,
    }
}

fn parse_case_clause(parser: &mut Parser) -> Result<CaseClause, ParseError> {
    let start = parser.current_span();
    let (list, is_default) = if parser.eat(&Token::Default) {
        (Vec::new(), true)
    } else {
        parser.expect(Token::Case)?;
        (expr::parse_expr_list(parser)?, false)
    };
    parser.expect(Token::Colon)?;
    let body = parse_stmt_list(parser);
    Ok(CaseClause {
        list,
        is_default,
        body,
        span: parser.span_from(start),
    })
}

fn parse_type_case_clause(parser: &mut Parser) -> Result<TypeCaseClause, ParseError> {
    let start = parser.current_span();
    let mut types_list = Vec::new();
    let is_default = if parser.eat(&Token::Default) {
        true
    } else {
        parser.expect(Token::Case)?;
        types_list.push(types::parse_type(parser)?);
        while parser.eat(&Token::Comma) {
            types_list.push(types::parse_type(parser)?);
        }
        false
    };
    parser.expect(Token::Colon)?;
    let body = parse_stmt_list(parser);
    Ok(TypeCaseClause {
        id: parser.node_id(),
        types: types_list,
        is_default,
        body,
        span: parser.span_from(start),
    })
}

fn parse_for(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.expect(Token::For)?;
    let outer = parser.expr_level;
    parser.expr_level = -1;
    let header = parse_for_header(parser);
    parser.expr_level = outer;
    let header = header?;

    let body = parse_block(parser)?;
    let span = parser.span_from(start);

    match header {
        ForHeader::Range(Stmt::Range(mut range)) => {
            range.body = body;
            range.span = span;
            Ok(Stmt::Range(range))
        }
        ForHeader::Range(other) => Err(ParseError::invalid_syntax(
            "malformed range clause",
            other.span(),
        )),
        ForHeader::Loop { init, cond, post } => Ok(Stmt::For(ForStmt {
            init,
            cond,
            post,
            body,
            span,
        })),
    }
}

enum ForHeader {
    Range(Stmt),
    Loop {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
    },
}

fn parse_for_header(parser: &mut Parser) -> Result<ForHeader, ParseError> {
    if parser.check(&Token::LBrace) {
        return Ok(ForHeader::Loop {
            init: None,
            cond: None,
            post: None,
        });
    }

    let mut first = None;
    if !parser.check(&Token::Semicolon) {
        let stmt = parse_simple_stmt(parser, SimpleMode::RangeOk)?;
        if matches!(stmt, Stmt::Range(_)) {
            return Ok(ForHeader::Range(stmt));
        }
        first = Some(stmt);
    }

    if !parser.eat(&Token::Semicolon) {
        let cond = first.map(into_cond).transpose()?;
        return Ok(ForHeader::Loop {
            init: None,
            cond,
            post: None,
        });
    }

    let init = first.map(Box::new);
    let cond = if parser.check(&Token::Semicolon) {
        None
    } else {
        Some(expr::parse_expr(parser)?)
    };
    parser.expect(Token::Semicolon)?;
    let post = if parser.check(&Token::LBrace) {
        None
    } else {
        Some(Box::new(parse_simple_stmt(parser, SimpleMode::Basic)?))
    };
    Ok(ForHeader::Loop { init, cond, post })
}
