//! Critic Syntax
//!
//! Reference front-end for the critic analysis engine: lexer, parser, type
//! checker, platform sizes and a lowered control-flow form for a Go-like
//! language.
//!
//! ```ignore
//! use critic_syntax::{check_file, CheckConfig, SourceFile};
//!
//! let file = SourceFile::parse("p.go", "package p\nfunc f() {}\n")?;
//! let info = check_file(&file.file, &CheckConfig::default());
//! let flow = critic_syntax::flow::build(&file.file, &info);
//! ```

pub mod ast;
pub mod check;
pub mod flow;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod source;
pub mod token;
pub mod types;

pub use check::{check_file, CheckConfig, Object, ObjectId, ObjectKind, Selection, TypeInfo};
pub use flow::{BasicBlock, Callee, FlowFunction, FlowProgram, Instruction};
pub use lexer::LexError;
pub use parser::{ParseError, ParseErrorKind};
pub use source::{LineIndex, SourceFile, SyntaxError};
pub use token::Span;
pub use types::{ConstValue, Sizes, TypeArena, TypeId};
