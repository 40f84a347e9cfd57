//! Expression parsing

use super::{stmt, types, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

fn binary_op(tok: &Token) -> Option<BinaryOp> {
    let op = match tok {
        Token::OrOr => BinaryOp::LOr,
        Token::AndAnd => BinaryOp::LAnd,
        Token::EqEq => BinaryOp::Eql,
        Token::NotEq => BinaryOp::Neq,
        Token::Lt => BinaryOp::Lss,
        Token::LtEq => BinaryOp::Leq,
        Token::Gt => BinaryOp::Gtr,
        Token::GtEq => BinaryOp::Geq,
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Pipe => BinaryOp::Or,
        Token::Caret => BinaryOp::Xor,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Quo,
        Token::Percent => BinaryOp::Rem,
        Token::Shl => BinaryOp::Shl,
        Token::Shr => BinaryOp::Shr,
        Token::Amp => BinaryOp::And,
        Token::AndNot => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

/// Parse an expression.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    parse_binary(parser, 1)
}

pub fn parse_expr_list(parser: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    let mut list = vec![parse_expr(parser)?];
    while parser.eat(&Token::Comma) {
        list.push(parse_expr(parser)?);
    }
    Ok(list)
}

fn parse_binary(parser: &mut Parser, min_prec: u8) -> Result<Expr, ParseError> {
    let mut x = parse_unary(parser)?;
    while let Some(op) = binary_op(parser.current()) {
        let prec = op.precedence();
        if prec < min_prec {
            break;
        }
        parser.advance();
        let y = parse_binary(parser, prec + 1)?;
        let span = x.span().to(&y.span());
        x = Expr::Binary(BinaryExpr {
            id: parser.node_id(),
            op,
            x: Box::new(x),
            y: Box::new(y),
            span,
        });
    }
    Ok(x)
}

fn parse_unary(parser: &mut Parser) -> Result<Expr, ParseError> {
    let start = parser.current_span();
    let op = match parser.current() {
        Token::Plus => UnaryOp::Pos,
        Token::Minus => UnaryOp::Neg,
        Token::Not => UnaryOp::Not,
        Token::Caret => UnaryOp::Xor,
        Token::Amp => UnaryOp::Addr,
        Token::Arrow => {
            if matches!(parser.peek(), Token::Chan) {
                return parse_primary(parser);
            }
            UnaryOp::Recv
        }
        Token::Star => {
            parser.advance();
            let x = parse_unary(parser)?;
            return Ok(Expr::Star(StarExpr {
                id: parser.node_id(),
                x: Box::new(x),
                span: parser.span_from(start),
            }));
        }
        _ => return parse_primary(parser),
    };
    parser.advance();
    let x = parse_unary(parser)?;
    Ok(Expr::Unary(UnaryExpr {
        id: parser.node_id(),
        op,
        x: Box::new(x),
        span: parser.span_from(start),
    }))
}

fn parse_operand(parser: &mut Parser) -> Result<Expr, ParseError> {
    let start = parser.current_span();
    let lit = |kind: LitKind, value: String, parser: &mut Parser| -> Result<Expr, ParseError> {
        parser.advance();
        Ok(Expr::BasicLit(BasicLit {
            id: parser.node_id(),
            kind,
            value,
            span: start,
        }))
    };
    match parser.current().clone() {
        Token::Ident(_) => Ok(Expr::Ident(parser.parse_ident()?)),
        Token::Int(v) => lit(LitKind::Int, v, parser),
        Token::Float(v) => lit(LitKind::Float, v, parser),
        Token::Imag(v) => lit(LitKind::Imag, v, parser),
        Token::Char(v) => lit(LitKind::Char, v, parser),
        Token::Str(v) => lit(LitKind::String, v, parser),
        Token::LParen => {
            parser.advance();
            let outer = parser.expr_level;
            parser.expr_level += 1;
            let x = parse_expr(parser);
            parser.expr_level = outer;
            let x = x?;
            parser.expect(Token::RParen)?;
            Ok(Expr::Paren(ParenExpr {
                id: parser.node_id(),
                x: Box::new(x),
                span: parser.span_from(start),
            }))
        }
        Token::Func => {
            parser.advance();
            let ty = types::parse_signature(parser)?;
            if parser.check(&Token::LBrace) {
                let outer = parser.expr_level;
                parser.expr_level = 0;
                let body = stmt::parse_block(parser);
                parser.expr_level = outer;
                let body = body?;
                Ok(Expr::FuncLit(FuncLit {
                    id: parser.node_id(),
                    ty,
                    body,
                    span: parser.span_from(start),
                }))
            } else {
                let span = parser.span_from(start);
                Ok(Expr::Type(TypeOperand {
                    id: parser.node_id(),
                    ty: TypeExpr::new(TypeExprKind::Func(ty), span),
                    span,
                }))
            }
        }
        Token::LBracket
        | Token::Map
        | Token::Chan
        | Token::Struct
        | Token::Interface
        | Token::Arrow => {
            let ty = types::parse_type(parser)?;
            let span = ty.span;
            Ok(Expr::Type(TypeOperand {
                id: parser.node_id(),
                ty,
                span,
            }))
        }
        _ => Err(parser.unexpected(&[Token::Ident(String::new())])),
    }
}

/// Types that may precede a composite literal body.
fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(sel) => matches!(*sel.x, Expr::Ident(_)),
        Expr::Type(operand) => matches!(
            operand.ty.kind,
            TypeExprKind::Array { .. }
                | TypeExprKind::Slice(_)
                | TypeExprKind::Map { .. }
                | TypeExprKind::Struct(_)
        ),
        _ => false,
    }
}

fn is_type_name(x: &Expr) -> bool {
    matches!(x, Expr::Ident(_) | Expr::Selector(_))
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, ParseError> {
    let start = parser.current_span();
    let mut x = parse_operand(parser)?;
    loop {
        match parser.current() {
            Token::Dot => {
                parser.advance();
                match parser.current() {
                    Token::Ident(_) => {
                        let sel = parser.parse_ident()?;
                        x = Expr::Selector(SelectorExpr {
                            id: parser.node_id(),
                            x: Box::new(x),
                            sel,
                            span: parser.span_from(start),
                        });
                    }
                    Token::LParen => {
                        parser.advance();
                        let ty = if parser.eat(&Token::Type) {
                            None
                        } else {
                            Some(Box::new(types::parse_type(parser)?))
                        };
                        parser.expect(Token::RParen)?;
                        x = Expr::TypeAssert(TypeAssertExpr {
                            id: parser.node_id(),
                            x: Box::new(x),
                            ty,
                            span: parser.span_from(start),
                        });
                    }
                    _ => {
                        return Err(
                            parser.unexpected(&[Token::Ident(String::new()), Token::LParen])
                        )
                    }
                }
            }
            Token::LBracket => {
                parser.advance();
                let outer = parser.expr_level;
                parser.expr_level += 1;
                let result = parse_index_or_slice(parser, x, start);
                parser.expr_level = outer;
                x = result?;
            }
            Token::LParen => {
                parser.advance();
                let outer = parser.expr_level;
                parser.expr_level += 1;
                let result = parse_call_args(parser);
                parser.expr_level = outer;
                let (args, ellipsis) = result?;
                x = Expr::Call(CallExpr {
                    id: parser.node_id(),
                    fun: Box::new(x),
                    args,
                    ellipsis,
                    span: parser.span_from(start),
                });
            }
            Token::LBrace
                if is_literal_type(&x) && (parser.expr_level >= 0 || !is_type_name(&x)) =>
            {
                let elts = parse_literal_value(parser)?;
                x = Expr::CompositeLit(CompositeLit {
                    id: parser.node_id(),
                    ty: Some(Box::new(x)),
                    elts,
                    span: parser.span_from(start),
                });
            }
            _ => return Ok(x),
        }
    }
}

fn parse_index_or_slice(
    parser: &mut Parser,
    x: Expr,
    start: crate::token::Span,
) -> Result<Expr, ParseError> {
    let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
    let mut colons = 0;
    if !parser.check(&Token::Colon) {
        parts[0] = Some(Box::new(parse_expr(parser)?));
    }
    while colons < 2 && parser.eat(&Token::Colon) {
        colons += 1;
        if !parser.check(&Token::Colon) && !parser.check(&Token::RBracket) {
            parts[colons] = Some(Box::new(parse_expr(parser)?));
        }
    }
    parser.expect(Token::RBracket)?;
    let span = parser.span_from(start);
    let [low, high, max] = parts;

    if colons == 0 {
        let index = low.ok_or_else(|| ParseError::invalid_syntax("expected operand", span))?;
        return Ok(Expr::Index(IndexExpr {
            id: parser.node_id(),
            x: Box::new(x),
            index,
            span,
        }));
    }
    let slice3 = colons == 2;
    if slice3 && (high.is_none() || max.is_none()) {
        return Err(ParseError::invalid_syntax(
            "middle and final index required in 3-index slice",
            span,
        ));
    }
    Ok(Expr::Slice(SliceExpr {
        id: parser.node_id(),
        x: Box::new(x),
        low,
        high,
        max,
        slice3,
        span,
    }))
}

fn parse_call_args(parser: &mut Parser) -> Result<(Vec<Expr>, bool), ParseError> {
    let mut args = Vec::new();
    let mut ellipsis = false;
    while !parser.check(&Token::RParen) && !parser.at_eof() {
        args.push(parse_expr(parser)?);
        if parser.eat(&Token::Ellipsis) {
            ellipsis = true;
        }
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RParen)?;
    Ok((args, ellipsis))
}

/// `{ elem, key: value, ... }` with elided inner literal types.
fn parse_literal_value(parser: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    parser.expect(Token::LBrace)?;
    let outer = parser.expr_level;
    parser.expr_level = 0;
    let result = parse_elements(parser);
    parser.expr_level = outer;
    let elts = result?;
    parser.expect(Token::RBrace)?;
    Ok(elts)
}

fn parse_elements(parser: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    let mut elts = Vec::new();
    while !parser.check(&Token::RBrace) && !parser.at_eof() {
        let start = parser.current_span();
        let key = parse_element(parser)?;
        let elt = if parser.eat(&Token::Colon) {
            let value = parse_element(parser)?;
            Expr::KeyValue(KeyValueExpr {
                id: parser.node_id(),
                key: Box::new(key),
                value: Box::new(value),
                span: parser.span_from(start),
            })
        } else {
            key
        };
        elts.push(elt);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    Ok(elts)
}

fn parse_element(parser: &mut Parser) -> Result<Expr, ParseError> {
    if parser.check(&Token::LBrace) {
        let start = parser.current_span();
        let elts = parse_literal_value(parser)?;
        return Ok(Expr::CompositeLit(CompositeLit {
            id: parser.node_id(),
            ty: None,
            elts,
            span: parser.span_from(start),
        }));
    }
    parse_expr(parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn expr(source: &str) -> Expr {
        Parser::new(tokenize(source).unwrap().tokens)
            .parse_expr_only()
            .unwrap()
    }

    #[test]
    fn test_precedence() {
        let Expr::Binary(bin) = expr("a + b * c == d") else {
            panic!("expected binary");
        };
        assert_eq!(bin.op, BinaryOp::Eql);
        let Expr::Binary(lhs) = &*bin.x else {
            panic!("expected binary lhs");
        };
        assert_eq!(lhs.op, BinaryOp::Add);
    }

    #[test]
    fn test_left_associative() {
        let Expr::Binary(bin) = expr("a - b - c") else {
            panic!("expected binary");
        };
        assert!(matches!(*bin.x, Expr::Binary(_)));
        assert!(matches!(*bin.y, Expr::Ident(_)));
    }

    #[test]
    fn test_call_selector_index() {
        let Expr::Call(call) = expr("strings.Replace(s[1:], \"a\", \"b\", 0)") else {
            panic!("expected call");
        };
        assert!(matches!(*call.fun, Expr::Selector(_)));
        assert_eq!(call.args.len(), 4);
        assert!(matches!(call.args[0], Expr::Slice(_)));
    }

    #[test]
    fn test_composite_literal() {
        let Expr::CompositeLit(lit) = expr("[]Point{{1, 2}, {X: 3}}") else {
            panic!("expected composite literal");
        };
        assert_eq!(lit.elts.len(), 2);
        assert!(matches!(&lit.elts[0], Expr::CompositeLit(inner) if inner.ty.is_none()));
    }

    #[test]
    fn test_type_assert_and_conversion() {
        assert!(matches!(expr("x.(*T)"), Expr::TypeAssert(_)));
        let Expr::Call(call) = expr("[]byte(s)") else {
            panic!("expected conversion");
        };
        assert!(matches!(*call.fun, Expr::Type(_)));
    }

    #[test]
    fn test_unary_and_receive() {
        assert!(matches!(expr("!ok"), Expr::Unary(UnaryExpr { op: UnaryOp::Not, .. })));
        assert!(matches!(expr("<-ch"), Expr::Unary(UnaryExpr { op: UnaryOp::Recv, .. })));
        assert!(matches!(expr("*p"), Expr::Star(_)));
    }

    #[test]
    fn test_variadic_call() {
        let Expr::Call(call) = expr("append(a, b...)") else {
            panic!("expected call");
        };
        assert!(call.ellipsis);
    }
}
