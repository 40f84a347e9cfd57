//! Source rendering of AST nodes
//!
//! Output follows the conventional formatting of the language: tab
//! indentation, spaces around binary operators except where a tighter
//! operator is nested inside a looser one (`a + b*c`).

use crate::ast::*;

/// Render an expression.
pub fn expr(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr);
    printer.out
}

/// Render a statement; nested blocks are indented with tabs.
pub fn stmt(stmt: &Stmt) -> String {
    let mut printer = Printer::default();
    printer.stmt(stmt);
    printer.out
}

pub fn type_expr(ty: &TypeExpr) -> String {
    let mut printer = Printer::default();
    printer.type_expr(ty);
    printer.out
}

/// Render a list of expressions separated by `, `.
pub fn expr_list(exprs: &[Expr]) -> String {
    let mut printer = Printer::default();
    printer.exprs(exprs);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        self.expr_prec(expr, None);
    }

    /// `parent` is the precedence of the enclosing binary operator.
    fn expr_prec(&mut self, expr: &Expr, parent: Option<u8>) {
        match expr {
            Expr::Ident(ident) => self.push(&ident.name),
            Expr::BasicLit(lit) => self.push(&lit.value),
            Expr::CompositeLit(lit) => {
                if let Some(ty) = &lit.ty {
                    self.expr(ty);
                }
                self.push("{");
                self.exprs(&lit.elts);
                self.push("}");
            }
            Expr::FuncLit(lit) => {
                self.push("func");
                self.signature(&lit.ty);
                self.push(" ");
                self.block(&lit.body);
            }
            Expr::Paren(paren) => {
                self.push("(");
                self.expr(&paren.x);
                self.push(")");
            }
            Expr::Selector(sel) => {
                self.expr_prec(&sel.x, Some(u8::MAX));
                self.push(".");
                self.push(&sel.sel.name);
            }
            Expr::Index(index) => {
                self.expr_prec(&index.x, Some(u8::MAX));
                self.push("[");
                self.expr(&index.index);
                self.push("]");
            }
            Expr::Slice(slice) => {
                self.expr_prec(&slice.x, Some(u8::MAX));
                self.push("[");
                if let Some(low) = &slice.low {
                    self.expr(low);
                }
                self.push(":");
                if let Some(high) = &slice.high {
                    self.expr(high);
                }
                if slice.slice3 {
                    self.push(":");
                    if let Some(max) = &slice.max {
                        self.expr(max);
                    }
                }
                self.push("]");
            }
            Expr::TypeAssert(assert) => {
                self.expr_prec(&assert.x, Some(u8::MAX));
                self.push(".(");
                match &assert.ty {
                    Some(ty) => self.type_expr(ty),
                    None => self.push("type"),
                }
                self.push(")");
            }
            Expr::Call(call) => {
                self.expr_prec(&call.fun, Some(u8::MAX));
                self.push("(");
                self.exprs(&call.args);
                if call.ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            Expr::Star(star) => {
                self.push("*");
                self.expr_prec(&star.x, Some(u8::MAX));
            }
            Expr::Unary(unary) => {
                self.push(unary.op.as_str());
                self.expr_prec(&unary.x, Some(u8::MAX));
            }
            Expr::Binary(binary) => {
                let prec = binary.op.precedence();
                // Multiplicative and additive operators nested under a
                // looser operator are written without spaces.
                let compact = prec >= 4 && parent.is_some_and(|p| p < prec);
                self.expr_prec(&binary.x, Some(prec));
                if compact {
                    self.push(binary.op.as_str());
                } else {
                    self.push(" ");
                    self.push(binary.op.as_str());
                    self.push(" ");
                }
                self.expr_prec(&binary.y, Some(prec));
            }
            Expr::KeyValue(kv) => {
                self.expr(&kv.key);
                self.push(": ");
                self.expr(&kv.value);
            }
            Expr::Type(operand) => self.type_expr(&operand.ty),
        }
    }

    fn type_expr(&mut self, ty: &TypeExpr) {
        match &ty.kind {
            TypeExprKind::Name(name) => self.push(&name.name),
            TypeExprKind::Qualified { pkg, name } => {
                self.push(&pkg.name);
                self.push(".");
                self.push(&name.name);
            }
            TypeExprKind::Pointer(elem) => {
                self.push("*");
                self.type_expr(elem);
            }
            TypeExprKind::Array { len, elem } => {
                self.push("[");
                match len {
                    Some(len) => self.expr(len),
                    None => self.push("..."),
                }
                self.push("]");
                self.type_expr(elem);
            }
            TypeExprKind::Slice(elem) => {
                self.push("[]");
                self.type_expr(elem);
            }
            TypeExprKind::Map { key, value } => {
                self.push("map[");
                self.type_expr(key);
                self.push("]");
                self.type_expr(value);
            }
            TypeExprKind::Chan { dir, elem } => {
                self.push(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.type_expr(elem);
            }
            TypeExprKind::Func(func) => {
                self.push("func");
                self.signature(func);
            }
            TypeExprKind::Interface(iface) => {
                if iface.elems.is_empty() {
                    self.push("interface{}");
                    return;
                }
                self.push("interface{ ");
                for (i, elem) in iface.elems.iter().enumerate() {
                    if i > 0 {
                        self.push("; ");
                    }
                    match elem {
                        InterfaceElem::Method { name, ty } => {
                            self.push(&name.name);
                            self.signature(ty);
                        }
                        InterfaceElem::Embedded(ty) => self.type_expr(ty),
                    }
                }
                self.push(" }");
            }
            TypeExprKind::Struct(st) => {
                if st.fields.is_empty() {
                    self.push("struct{}");
                    return;
                }
                self.push("struct{ ");
                for (i, field) in st.fields.iter().enumerate() {
                    if i > 0 {
                        self.push("; ");
                    }
                    self.field(field);
                    if let Some(tag) = &field.tag {
                        self.push(" ");
                        self.push(tag);
                    }
                }
                self.push(" }");
            }
            TypeExprKind::Ellipsis(elem) => {
                self.push("...");
                self.type_expr(elem);
            }
            TypeExprKind::Paren(inner) => {
                self.push("(");
                self.type_expr(inner);
                self.push(")");
            }
        }
    }

    fn field(&mut self, field: &Field) {
        for (i, name) in field.names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&name.name);
        }
        if !field.names.is_empty() {
            self.push(" ");
        }
        self.type_expr(&field.ty);
    }

    fn fields(&mut self, list: &FieldList) {
        for (i, field) in list.fields.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.field(field);
        }
    }

    fn signature(&mut self, func: &FuncType) {
        self.push("(");
        self.fields(&func.params);
        self.push(")");
        match func.results.fields.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                self.push(" ");
                self.type_expr(&single.ty);
            }
            _ => {
                self.push(" (");
                self.fields(&func.results);
                self.push(")");
            }
        }
    }

    fn block(&mut self, block: &Block) {
        if block.stmts.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for stmt in &block.stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn clause_body(&mut self, body: &[Stmt]) {
        self.indent += 1;
        for stmt in body {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(gen) => self.gen_decl(gen),
            Stmt::Empty(_) => {}
            Stmt::Labeled(labeled) => {
                self.push(&labeled.label.name);
                self.push(":");
                self.newline();
                self.stmt(&labeled.stmt);
            }
            Stmt::Expr(stmt) => self.expr(&stmt.x),
            Stmt::Send(send) => {
                self.expr(&send.chan);
                self.push(" <- ");
                self.expr(&send.value);
            }
            Stmt::IncDec(stmt) => {
                self.expr(&stmt.x);
                self.push(if stmt.inc { "++" } else { "--" });
            }
            Stmt::Assign(assign) => {
                self.exprs(&assign.lhs);
                self.push(" ");
                self.push(assign.tok.as_str());
                self.push(" ");
                self.exprs(&assign.rhs);
            }
            Stmt::Go(stmt) => {
                self.push("go ");
                self.expr(&stmt.call);
            }
            Stmt::Defer(stmt) => {
                self.push("defer ");
                self.expr(&stmt.call);
            }
            Stmt::Return(ret) => {
                self.push("return");
                if !ret.results.is_empty() {
                    self.push(" ");
                    self.exprs(&ret.results);
                }
            }
            Stmt::Branch(branch) => {
                self.push(branch.kind.as_str());
                if let Some(label) = &branch.label {
                    self.push(" ");
                    self.push(&label.name);
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::If(stmt) => {
                self.push("if ");
                if let Some(init) = &stmt.init {
                    self.stmt(init);
                    self.push("; ");
                }
                self.expr(&stmt.cond);
                self.push(" ");
                self.block(&stmt.body);
                if let Some(else_branch) = &stmt.else_branch {
                    self.push(" else ");
                    self.stmt(else_branch);
                }
            }
            Stmt::Switch(switch) => {
                self.push("switch ");
                if let Some(init) = &switch.init {
                    self.stmt(init);
                    self.push("; ");
                }
                if let Some(tag) = &switch.tag {
                    self.expr(tag);
                    self.push(" ");
                }
                self.push("{");
                for clause in &switch.clauses {
                    self.newline();
                    if clause.is_default {
                        self.push("default:");
                    } else {
                        self.push("case ");
                        self.exprs(&clause.list);
                        self.push(":");
                    }
                    self.clause_body(&clause.body);
                }
                self.newline();
                self.push("}");
            }
            Stmt::TypeSwitch(switch) => {
                self.push("switch ");
                if let Some(init) = &switch.init {
                    self.stmt(init);
                    self.push("; ");
                }
                if let Some(binding) = &switch.binding {
                    self.push(&binding.name);
                    self.push(" := ");
                }
                self.expr(&switch.guard);
                self.push(" {");
                for clause in &switch.clauses {
                    self.newline();
                    if clause.is_default {
                        self.push("default:");
                    } else {
                        self.push("case ");
                        for (i, ty) in clause.types.iter().enumerate() {
                            if i > 0 {
                                self.push(", ");
                            }
                            self.type_expr(ty);
                        }
                        self.push(":");
                    }
                    self.clause_body(&clause.body);
                }
                self.newline();
                self.push("}");
            }
            Stmt::For(stmt) => {
                self.push("for ");
                if stmt.init.is_some() || stmt.post.is_some() {
                    if let Some(init) = &stmt.init {
                        self.stmt(init);
                    }
                    self.push("; ");
                    if let Some(cond) = &stmt.cond {
                        self.expr(cond);
                    }
                    self.push("; ");
                    if let Some(post) = &stmt.post {
                        self.stmt(post);
                    }
                    self.push(" ");
                } else if let Some(cond) = &stmt.cond {
                    self.expr(cond);
                    self.push(" ");
                }
                self.block(&stmt.body);
            }
            Stmt::Range(range) => {
                self.push("for ");
                if let Some(key) = &range.key {
                    self.expr(key);
                    if let Some(value) = &range.value {
                        self.push(", ");
                        self.expr(value);
                    }
                    self.push(if range.define { " := " } else { " = " });
                }
                self.push("range ");
                self.expr(&range.x);
                self.push(" ");
                self.block(&range.body);
            }
        }
    }

    fn gen_decl(&mut self, gen: &GenDecl) {
        self.push(gen.kind.as_str());
        if gen.grouped {
            self.push(" (");
            self.indent += 1;
            for spec in &gen.specs {
                self.newline();
                self.spec(spec);
            }
            self.indent -= 1;
            self.newline();
            self.push(")");
            return;
        }
        for spec in &gen.specs {
            self.push(" ");
            self.spec(spec);
        }
    }

    fn spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Import(import) => {
                if let Some(name) = &import.name {
                    self.push(&name.name);
                    self.push(" ");
                }
                self.push(&import.path.value);
            }
            Spec::Value(value) => {
                for (i, name) in value.names.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&name.name);
                }
                if let Some(ty) = &value.ty {
                    self.push(" ");
                    self.type_expr(ty);
                }
                if !value.values.is_empty() {
                    self.push(" = ");
                    self.exprs(&value.values);
                }
            }
            Spec::Type(spec) => {
                self.push(&spec.name.name);
                self.push(if spec.alias { " = " } else { " " });
                self.type_expr(&spec.ty);
            }
        }
    }
}
