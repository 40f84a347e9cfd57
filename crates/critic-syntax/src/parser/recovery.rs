//! Error recovery strategies for the parser.

use super::Parser;
use crate::token::Token;

/// Skip to the next top-level declaration keyword.
pub fn sync_to_decl(parser: &mut Parser) {
    while !parser.at_eof() {
        match parser.current() {
            Token::Func | Token::Const | Token::Var | Token::Type | Token::Import => return,
            _ => {
                parser.advance();
            }
        }
    }
}

/// Skip to the next statement boundary inside a block.
pub fn sync_to_stmt(parser: &mut Parser) {
    while !parser.at_eof() {
        match parser.current() {
            Token::Semicolon => {
                parser.advance();
                return;
            }
            Token::RBrace | Token::Case | Token::Default => return,
            Token::If
            | Token::For
            | Token::Switch
            | Token::Return
            | Token::Go
            | Token::Defer
            | Token::Var
            | Token::Const
            | Token::Type => return,
            _ => {
                parser.advance();
            }
        }
    }
}
