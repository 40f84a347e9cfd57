//! File and declaration parsing

use super::{expr, recovery, stmt, types, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

pub fn parse_file(parser: &mut Parser) -> Result<File, ParseError> {
    let start = parser.current_span();
    let package_span = parser.expect(Token::Package)?;
    let package = parser.parse_ident()?;
    parser.expect_semi()?;

    let mut decls = Vec::new();
    while !parser.at_eof() {
        let before = parser.pos;
        let result = match parser.current() {
            Token::Func => parse_func_decl(parser).map(Decl::Func),
            Token::Import | Token::Const | Token::Var | Token::Type => {
                parse_gen_decl(parser).map(Decl::Gen)
            }
            _ => Err(parser.unexpected(&[Token::Func, Token::Var, Token::Const, Token::Type])),
        };
        match result.and_then(|decl| parser.expect_semi().map(|_| decl)) {
            Ok(decl) => decls.push(decl),
            Err(err) => {
                parser.record(err);
                if parser.pos == before {
                    parser.advance();
                }
                recovery::sync_to_decl(parser);
            }
        }
    }

    Ok(File {
        package,
        package_span,
        decls,
        span: parser.span_from(start),
    })
}

pub fn parse_func_decl(parser: &mut Parser) -> Result<FuncDecl, ParseError> {
    let start = parser.expect(Token::Func)?;
    let recv = if parser.check(&Token::LParen) {
        Some(types::parse_parameters(parser)?)
    } else {
        None
    };
    let name = parser.parse_ident()?;
    let ty = types::parse_signature(parser)?;
    let body = if parser.check(&Token::LBrace) {
        let outer = parser.expr_level;
        parser.expr_level = 0;
        let body = stmt::parse_block(parser);
        parser.expr_level = outer;
        Some(body?)
    } else {
        None
    };
    Ok(FuncDecl {
        id: parser.node_id(),
        recv,
        name,
        ty,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_gen_decl(parser: &mut Parser) -> Result<GenDecl, ParseError> {
    let start = parser.current_span();
    let kind = match parser.advance() {
        Token::Import => DeclKind::Import,
        Token::Const => DeclKind::Const,
        Token::Var => DeclKind::Var,
        Token::Type => DeclKind::Type,
        other => {
            return Err(ParseError::unexpected_token(
                vec![Token::Import, Token::Const, Token::Var, Token::Type],
                other,
                start,
            ))
        }
    };

    let mut specs = Vec::new();
    let grouped = parser.eat(&Token::LParen);
    if grouped {
        let mut index = 0;
        while !parser.check(&Token::RParen) && !parser.at_eof() {
            specs.push(parse_spec(parser, kind, index)?);
            parser.expect_semi()?;
            index += 1;
        }
        parser.expect(Token::RParen)?;
    } else {
        specs.push(parse_spec(parser, kind, 0)?);
    }

    Ok(GenDecl {
        kind,
        specs,
        grouped,
        span: parser.span_from(start),
    })
}

fn parse_spec(parser: &mut Parser, kind: DeclKind, index: usize) -> Result<Spec, ParseError> {
    let start = parser.current_span();
    match kind {
        DeclKind::Import => {
            let name = match parser.current() {
                Token::Ident(_) => Some(parser.parse_ident()?),
                Token::Dot => {
                    let span = parser.current_span();
                    parser.advance();
                    Some(Ident {
                        id: parser.node_id(),
                        name: ".".to_string(),
                        span,
                    })
                }
                _ => None,
            };
            let path = match parser.current().clone() {
                Token::Str(raw) => {
                    let span = parser.current_span();
                    parser.advance();
                    BasicLit {
                        id: parser.node_id(),
                        kind: LitKind::String,
                        value: raw,
                        span,
                    }
                }
                _ => return Err(parser.unexpected(&[Token::Str(String::new())])),
            };
            Ok(Spec::Import(ImportSpec {
                name,
                path,
                span: parser.span_from(start),
            }))
        }
        DeclKind::Const | DeclKind::Var => {
            let names = parser.parse_ident_list()?;
            let ty = if matches!(
                parser.current(),
                Token::Assign | Token::Semicolon | Token::RParen
            ) {
                None
            } else {
                Some(types::parse_type(parser)?)
            };
            let values = if parser.eat(&Token::Assign) {
                expr::parse_expr_list(parser)?
            } else {
                Vec::new()
            };
            Ok(Spec::Value(ValueSpec {
                names,
                ty,
                values,
                index,
                span: parser.span_from(start),
            }))
        }
        DeclKind::Type => {
            let name = parser.parse_ident()?;
            let alias = parser.eat(&Token::Assign);
            let ty = types::parse_type(parser)?;
            Ok(Spec::Type(TypeSpec {
                name,
                alias,
                ty,
                span: parser.span_from(start),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn file(source: &str) -> File {
        Parser::new(tokenize(source).unwrap().tokens)
            .parse_file()
            .unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let f = file("package main\n\nimport (\n\t\"fmt\"\n\tstr \"strings\"\n)\nimport \"os\"\n");
        assert_eq!(f.package.name, "main");
        let paths: Vec<String> = f.imports().map(|i| i.path_value()).collect();
        assert_eq!(paths, vec!["fmt", "strings", "os"]);
    }

    #[test]
    fn test_method_declaration() {
        let f = file("package p\nfunc (r *Reader) Read(buf []byte) (n int, err error) { return 0, nil }\n");
        let func = f.funcs().next().unwrap();
        assert!(func.is_method());
        assert_eq!(func.name.name, "Read");
        assert_eq!(func.ty.results.len(), 2);
    }

    #[test]
    fn test_const_iota_indices() {
        let f = file("package p\nconst (\n\tA = iota\n\tB\n\tC\n)\n");
        let Decl::Gen(gen) = &f.decls[0] else {
            panic!("expected const decl");
        };
        assert!(gen.grouped);
        let indices: Vec<usize> = gen
            .specs
            .iter()
            .map(|s| match s {
                Spec::Value(v) => v.index,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_type_declarations() {
        let f = file("package p\ntype T struct {\n\ta, b int\n\tio.Reader\n\tname string `json:\"name\"`\n}\ntype A = T\n");
        let Decl::Gen(gen) = &f.decls[0] else {
            panic!("expected type decl");
        };
        let Spec::Type(spec) = &gen.specs[0] else {
            panic!("expected type spec");
        };
        let TypeExprKind::Struct(st) = &spec.ty.kind else {
            panic!("expected struct");
        };
        assert_eq!(st.fields.len(), 3);
        assert!(st.fields[1].names.is_empty());
        assert!(st.fields[2].tag.is_some());
        assert!(matches!(&f.decls[1], Decl::Gen(g) if matches!(&g.specs[0], Spec::Type(t) if t.alias)));
    }

    #[test]
    fn test_recovers_to_next_declaration() {
        let errors = Parser::new(tokenize("package p\nfunc f( {\n}\nfunc g() {}\n").unwrap().tokens)
            .parse_file()
            .unwrap_err();
        assert!(!errors.is_empty());
    }
}
