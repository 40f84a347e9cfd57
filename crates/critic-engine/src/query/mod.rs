//! Semantic queries shared by checkers
//!
//! Pure functions over a [`Program`](crate::Program) and its syntax tree.
//! Each answers from the node at hand and the semantic tables, never by
//! rescanning the file, so checkers may call them once per visited node.
//! Missing semantic information yields `false`/`None`.

mod calls;
mod files;
mod literal;
mod types;

pub use calls::{
    call_name, filter_debug, flow_call_name, is_call_to, is_call_to_any, is_object,
    render_args, selector_name,
};
pub use files::{
    group_specs, is_example, is_generated, is_in_main, is_in_test, is_test_file, preamble,
};
pub use literal::{
    bool_const, expr_to_int, expr_to_string, is_basic_lit, is_blank, is_bool_const, is_ident,
    is_int_literal, is_nil, is_string_literal, is_zero,
};
pub use types::{dereference, dereference_r, is_of_type, is_pointer_like, is_type};

#[cfg(test)]
pub(crate) mod fixture {
    use critic_syntax::ast::{Expr, FuncDecl, Stmt};
    use critic_syntax::{check_file, CheckConfig, SourceFile, TypeInfo};

    pub struct Loaded {
        pub file: SourceFile,
        pub info: TypeInfo,
    }

    impl Loaded {
        pub fn new(src: &str) -> Self {
            Self::at("q.go", src)
        }

        pub fn at(path: &str, src: &str) -> Self {
            let file = SourceFile::parse(path, src).unwrap();
            let info = check_file(&file.file, &CheckConfig::default());
            Self { file, info }
        }

        pub fn program(&self) -> crate::Program<'_> {
            crate::Program::new(&self.file, &self.info)
        }

        pub fn func(&self, name: &str) -> &FuncDecl {
            self.file.file.funcs().find(|f| f.name.name == name).unwrap()
        }

        pub fn body(&self, name: &str) -> &[Stmt] {
            &self.func(name).body.as_ref().unwrap().stmts
        }

        /// Expression of the `n`th statement of `func`, looking through
        /// `_ = x` assignments and expression statements.
        pub fn expr(&self, func: &str, n: usize) -> &Expr {
            match &self.body(func)[n] {
                Stmt::Expr(stmt) => &stmt.x,
                Stmt::Assign(assign) => &assign.rhs[0],
                other => panic!("statement has no expression: {:?}", other),
            }
        }
    }
}
