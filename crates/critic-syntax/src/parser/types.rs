//! Type, signature and field-list parsing

use super::{expr, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

/// Returns true if the current token can start a type.
pub fn at_type_start(parser: &Parser) -> bool {
    matches!(
        parser.current(),
        Token::Ident(_)
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Func
            | Token::Interface
            | Token::Struct
            | Token::LParen
            | Token::Arrow
    )
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, ParseError> {
    let start = parser.current_span();
    let kind = match parser.current() {
        Token::Ident(_) => {
            let name = parser.parse_ident()?;
            if parser.check(&Token::Dot) {
                parser.advance();
                let sel = parser.parse_ident()?;
                TypeExprKind::Qualified { pkg: name, name: sel }
            } else {
                TypeExprKind::Name(name)
            }
        }
        Token::Star => {
            parser.advance();
            TypeExprKind::Pointer(Box::new(parse_type(parser)?))
        }
        Token::LBracket => {
            parser.advance();
            if parser.eat(&Token::RBracket) {
                TypeExprKind::Slice(Box::new(parse_type(parser)?))
            } else {
                let len = if parser.eat(&Token::Ellipsis) {
                    None
                } else {
                    let outer = parser.expr_level;
                    parser.expr_level += 1;
                    let len = expr::parse_expr(parser);
                    parser.expr_level = outer;
                    Some(Box::new(len?))
                };
                parser.expect(Token::RBracket)?;
                let elem = Box::new(parse_type(parser)?);
                TypeExprKind::Array { len, elem }
            }
        }
        Token::Map => {
            parser.advance();
            parser.expect(Token::LBracket)?;
            let key = Box::new(parse_type(parser)?);
            parser.expect(Token::RBracket)?;
            let value = Box::new(parse_type(parser)?);
            TypeExprKind::Map { key, value }
        }
        Token::Chan => {
            parser.advance();
            let dir = if parser.eat(&Token::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            };
            TypeExprKind::Chan {
                dir,
                elem: Box::new(parse_type(parser)?),
            }
        }
        Token::Arrow => {
            parser.advance();
            parser.expect(Token::Chan)?;
            TypeExprKind::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(parse_type(parser)?),
            }
        }
        Token::Func => {
            parser.advance();
            TypeExprKind::Func(parse_signature(parser)?)
        }
        Token::Interface => {
            parser.advance();
            TypeExprKind::Interface(parse_interface_body(parser)?)
        }
        Token::Struct => {
            parser.advance();
            TypeExprKind::Struct(parse_struct_body(parser)?)
        }
        Token::LParen => {
            parser.advance();
            let inner = parse_type(parser)?;
            parser.expect(Token::RParen)?;
            TypeExprKind::Paren(Box::new(inner))
        }
        _ => {
            return Err(parser.unexpected(&[
                Token::Ident(String::new()),
                Token::LBracket,
                Token::Star,
            ]))
        }
    };
    Ok(TypeExpr::new(kind, parser.span_from(start)))
}

fn parse_param_type(parser: &mut Parser) -> Result<TypeExpr, ParseError> {
    if parser.check(&Token::Ellipsis) {
        let start = parser.current_span();
        parser.advance();
        let elem = parse_type(parser)?;
        return Ok(TypeExpr::new(
            TypeExprKind::Ellipsis(Box::new(elem)),
            parser.span_from(start),
        ));
    }
    parse_type(parser)
}

/// Parameters and optional results, starting at `(`.
pub fn parse_signature(parser: &mut Parser) -> Result<FuncType, ParseError> {
    let start = parser.current_span();
    let params = parse_parameters(parser)?;
    let results = if parser.check(&Token::LParen) {
        parse_parameters(parser)?
    } else if at_type_start(parser) {
        let ty = parse_type(parser)?;
        let span = ty.span;
        FieldList {
            fields: vec![Field {
                names: Vec::new(),
                ty,
                tag: None,
                span,
            }],
            span,
        }
    } else {
        FieldList::default()
    };
    Ok(FuncType {
        params,
        results,
        span: parser.span_from(start),
    })
}

/// A parenthesized parameter list.
///
/// Entries are either all named (`a, b int, c string`) or all anonymous
/// (`int, string`); the two forms are told apart once the list is read.
pub fn parse_parameters(parser: &mut Parser) -> Result<FieldList, ParseError> {
    let start = parser.expect(Token::LParen)?;
    let mut entries: Vec<(Option<Ident>, Option<TypeExpr>)> = Vec::new();

    while !parser.check(&Token::RParen) && !parser.at_eof() {
        if matches!(parser.current(), Token::Ident(_)) {
            let ident = parser.parse_ident()?;
            match parser.current() {
                Token::Dot => {
                    parser.advance();
                    let sel = parser.parse_ident()?;
                    let span = ident.span.to(&sel.span);
                    entries.push((
                        None,
                        Some(TypeExpr::new(
                            TypeExprKind::Qualified { pkg: ident, name: sel },
                            span,
                        )),
                    ));
                }
                Token::Comma | Token::RParen => entries.push((Some(ident), None)),
                _ => {
                    let ty = parse_param_type(parser)?;
                    entries.push((Some(ident), Some(ty)));
                }
            }
        } else {
            entries.push((None, Some(parse_param_type(parser)?)));
        }
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RParen)?;
    let span = parser.span_from(start);

    let named = entries
        .iter()
        .any(|(name, ty)| name.is_some() && ty.is_some());

    let mut fields = Vec::new();
    if named {
        let mut pending: Vec<Ident> = Vec::new();
        for (name, ty) in entries {
            match (name, ty) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    let names = std::mem::take(&mut pending);
                    let field_span = names[0].span.to(&ty.span);
                    fields.push(Field {
                        names,
                        ty,
                        tag: None,
                        span: field_span,
                    });
                }
                (None, Some(ty)) => {
                    return Err(ParseError::invalid_syntax(
                        "mixed named and unnamed parameters",
                        ty.span,
                    ))
                }
                (None, None) => {}
            }
        }
        if let Some(name) = pending.first() {
            return Err(ParseError::invalid_syntax(
                "mixed named and unnamed parameters",
                name.span,
            ));
        }
    } else {
        for (name, ty) in entries {
            let ty = match (name, ty) {
                (_, Some(ty)) => ty,
                (Some(name), None) => {
                    let span = name.span;
                    TypeExpr::new(TypeExprKind::Name(name), span)
                }
                (None, None) => continue,
            };
            let field_span = ty.span;
            fields.push(Field {
                names: Vec::new(),
                ty,
                tag: None,
                span: field_span,
            });
        }
    }

    Ok(FieldList { fields, span })
}

pub fn parse_struct_body(parser: &mut Parser) -> Result<StructType, ParseError> {
    parser.expect(Token::LBrace)?;
    let mut fields = Vec::new();
    while !parser.check(&Token::RBrace) && !parser.at_eof() {
        fields.push(parse_struct_field(parser)?);
        parser.expect_semi()?;
    }
    parser.expect(Token::RBrace)?;
    Ok(StructType { fields })
}

fn parse_struct_field(parser: &mut Parser) -> Result<Field, ParseError> {
    let start = parser.current_span();
    let (names, ty) = match parser.current() {
        Token::Star => (Vec::new(), parse_type(parser)?),
        Token::Ident(_) => {
            let first = parser.parse_ident()?;
            match parser.current() {
                Token::Dot => {
                    parser.advance();
                    let sel = parser.parse_ident()?;
                    let span = first.span.to(&sel.span);
                    (
                        Vec::new(),
                        TypeExpr::new(TypeExprKind::Qualified { pkg: first, name: sel }, span),
                    )
                }
                Token::Semicolon | Token::RBrace | Token::Str(_) => {
                    let span = first.span;
                    (Vec::new(), TypeExpr::new(TypeExprKind::Name(first), span))
                }
                _ => {
                    let mut names = vec![first];
                    while parser.eat(&Token::Comma) {
                        names.push(parser.parse_ident()?);
                    }
                    (names, parse_type(parser)?)
                }
            }
        }
        _ => return Err(parser.unexpected(&[Token::Ident(String::new()), Token::Star])),
    };
    let tag = match parser.current().clone() {
        Token::Str(raw) => {
            parser.advance();
            Some(raw)
        }
        _ => None,
    };
    Ok(Field {
        names,
        ty,
        tag,
        span: parser.span_from(start),
    })
}

pub fn parse_interface_body(parser: &mut Parser) -> Result<InterfaceType, ParseError> {
    parser.expect(Token::LBrace)?;
    let mut elems = Vec::new();
    while !parser.check(&Token::RBrace) && !parser.at_eof() {
        if matches!(parser.current(), Token::Ident(_)) && matches!(parser.peek(), Token::LParen) {
            let name = parser.parse_ident()?;
            let ty = parse_signature(parser)?;
            elems.push(InterfaceElem::Method { name, ty });
        } else {
            elems.push(InterfaceElem::Embedded(parse_type(parser)?));
        }
        parser.expect_semi()?;
    }
    parser.expect(Token::RBrace)?;
    Ok(InterfaceType { elems })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn params(source: &str) -> FieldList {
        let mut parser = Parser::new(tokenize(source).unwrap().tokens);
        parse_parameters(&mut parser).unwrap()
    }

    #[test]
    fn test_grouped_named_params() {
        let list = params("(a, b int, c string)");
        assert_eq!(list.fields.len(), 2);
        assert_eq!(list.fields[0].names.len(), 2);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_anonymous_params() {
        let list = params("(int, []string, pkg.T)");
        assert_eq!(list.fields.len(), 3);
        assert!(list.fields.iter().all(|f| f.names.is_empty()));
        assert!(matches!(list.fields[2].ty.kind, TypeExprKind::Qualified { .. }));
    }

    #[test]
    fn test_variadic_param() {
        let list = params("(format string, args ...interface{})");
        assert!(matches!(list.fields[1].ty.kind, TypeExprKind::Ellipsis(_)));
    }

    #[test]
    fn test_mixed_params_rejected() {
        let mut parser = Parser::new(tokenize("(a int, string)").unwrap().tokens);
        assert!(parse_parameters(&mut parser).is_err());
    }

    #[test]
    fn test_array_type() {
        let mut parser = Parser::new(tokenize("[1024]*int").unwrap().tokens);
        let ty = parse_type(&mut parser).unwrap();
        let TypeExprKind::Array { len: Some(_), elem } = &ty.kind else {
            panic!("expected array type");
        };
        assert!(matches!(elem.kind, TypeExprKind::Pointer(_)));
        assert_eq!((ty.span.start, ty.span.end), (0, 10));
    }
}
