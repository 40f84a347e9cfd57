use super::*;
use crate::ast::{Decl, Expr, Spec, Stmt};
use crate::source::SourceFile;
use crate::types::{BasicKind, Sizes};
use pretty_assertions::assert_eq;

fn check(src: &str) -> (SourceFile, TypeInfo) {
    let file = SourceFile::parse("test.go", src).unwrap();
    let info = check_file(&file.file, &CheckConfig::default());
    (file, info)
}

fn func_body<'a>(file: &'a SourceFile, name: &str) -> &'a [Stmt] {
    file.file
        .funcs()
        .find(|f| f.name.name == name)
        .and_then(|f| f.body.as_ref())
        .map(|b| b.stmts.as_slice())
        .unwrap()
}

fn expr_stmt(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Expr(e) => &e.x,
        other => panic!("not an expression statement: {:?}", other),
    }
}

fn const_of(info: &TypeInfo, file: &SourceFile, name: &str) -> Option<ConstValue> {
    for decl in &file.file.decls {
        let Decl::Gen(gen) = decl else { continue };
        for spec in &gen.specs {
            let Spec::Value(spec) = spec else { continue };
            for ident in &spec.names {
                if ident.name == name {
                    let obj = info.object_of(ident)?;
                    return info.object(obj)?.const_value().cloned();
                }
            }
        }
    }
    None
}

#[test]
fn test_iota_and_implicit_repetition() {
    let (file, info) = check(
        "package p\nconst (\n\tA = iota * 10\n\tB\n\tC\n)\nconst D = C + 1\n",
    );
    assert_eq!(const_of(&info, &file, "A"), Some(ConstValue::Int(0)));
    assert_eq!(const_of(&info, &file, "B"), Some(ConstValue::Int(10)));
    assert_eq!(const_of(&info, &file, "C"), Some(ConstValue::Int(20)));
    assert_eq!(const_of(&info, &file, "D"), Some(ConstValue::Int(21)));
}

#[test]
fn test_integer_division_truncates() {
    let (file, info) = check("package p\nconst X = 7 / 2\nconst Y = 7.0 / 2\n");
    assert_eq!(const_of(&info, &file, "X"), Some(ConstValue::Int(3)));
    assert_eq!(const_of(&info, &file, "Y"), Some(ConstValue::Float(3.5)));
}

#[test]
fn test_untyped_constant_takes_context_type() {
    let (file, info) = check("package p\nfunc f(x int64) { _ = x == 1 }\n");
    let Stmt::Assign(assign) = &func_body(&file, "f")[0] else {
        panic!("expected assignment");
    };
    let Expr::Binary(cmp) = &assign.rhs[0] else {
        panic!("expected comparison");
    };
    assert_eq!(
        info.type_of(cmp.y.id()),
        Some(TypeArena::basic(BasicKind::Int64))
    );
    assert_eq!(
        info.type_of(cmp.id),
        Some(TypeArena::basic(BasicKind::UntypedBool))
    );
}

#[test]
fn test_method_call_resolves_to_method_object() {
    let (file, info) = check(
        "package p\ntype T struct{ n int }\nfunc (t *T) Get() int { return t.n }\nfunc f(t *T) { t.Get() }\n",
    );
    let Expr::Call(call) = expr_stmt(&func_body(&file, "f")[0]) else {
        panic!("expected call");
    };
    let Expr::Selector(sel) = call.fun.as_ref() else {
        panic!("expected selector");
    };
    let obj = info.object_of(&sel.sel).unwrap();
    assert_eq!(info.full_name(obj).unwrap(), "(*p.T).Get");
    let selection = info.selection(sel.id).unwrap();
    assert_eq!(selection.kind, SelectionKind::MethodVal);
    assert_eq!(info.type_of(call.id), Some(TypeArena::basic(BasicKind::Int)));
}

#[test]
fn test_promoted_field_through_embedding() {
    let (file, info) = check(
        "package p\ntype Base struct{ ID string }\ntype User struct{ Base; Name string }\nfunc f(u User) { _ = u.ID }\n",
    );
    let Stmt::Assign(assign) = &func_body(&file, "f")[0] else {
        panic!("expected assignment");
    };
    assert_eq!(
        info.type_of(assign.rhs[0].id()),
        Some(TypeArena::basic(BasicKind::String))
    );
    let Expr::Selector(sel) = &assign.rhs[0] else {
        panic!("expected selector");
    };
    assert_eq!(info.selection(sel.id).unwrap().kind, SelectionKind::FieldVal);
}

#[test]
fn test_interface_method_has_no_object() {
    let (file, info) = check(
        "package p\ntype I interface{ M() }\nfunc f(i I) { i.M() }\n",
    );
    let Expr::Call(call) = expr_stmt(&func_body(&file, "f")[0]) else {
        panic!("expected call");
    };
    let Expr::Selector(sel) = call.fun.as_ref() else {
        panic!("expected selector");
    };
    let selection = info.selection(sel.id).unwrap();
    assert!(selection.obj.is_none());
    assert!(info.types.is_interface(selection.recv));
}

#[test]
fn test_imported_members_are_external() {
    let (file, info) = check(
        "package p\nimport \"strings\"\nfunc f(s string) { strings.Replace(s, \"a\", \"b\", -1) }\n",
    );
    let Expr::Call(call) = expr_stmt(&func_body(&file, "f")[0]) else {
        panic!("expected call");
    };
    let Expr::Selector(sel) = call.fun.as_ref() else {
        panic!("expected selector");
    };
    let obj = info.object_of(&sel.sel).unwrap();
    assert_eq!(info.full_name(obj).unwrap(), "strings.Replace");
    assert_eq!(info.type_of(call.id), None);
}

#[test]
fn test_package_path_override() {
    let file = SourceFile::parse("a.go", "package a\nfunc F() {}\n").unwrap();
    let config = CheckConfig {
        package_path: Some("example.com/a".to_string()),
    };
    let info = check_file(&file.file, &config);
    let func = file.file.funcs().next().unwrap();
    let obj = info.object_of(&func.name).unwrap();
    assert_eq!(info.full_name(obj).unwrap(), "example.com/a.F");
}

#[test]
fn test_short_var_decl_types() {
    let (file, info) = check(
        "package p\nfunc pair() (int, string) { return 0, \"\" }\nfunc f(m map[string]bool) {\n\tn, s := pair()\n\tv, ok := m[s]\n\t_, _, _ = n, v, ok\n}\n",
    );
    let body = func_body(&file, "f");
    let Stmt::Assign(first) = &body[0] else {
        panic!("expected assignment");
    };
    let n = first.lhs[0].as_ident().unwrap();
    let s = first.lhs[1].as_ident().unwrap();
    let ty = |ident: &crate::ast::Ident| info.object(info.object_of(ident).unwrap()).unwrap().ty;
    assert_eq!(ty(n), TypeArena::basic(BasicKind::Int));
    assert_eq!(ty(s), TypeArena::basic(BasicKind::String));

    let Stmt::Assign(second) = &body[1] else {
        panic!("expected assignment");
    };
    let ok = second.lhs[1].as_ident().unwrap();
    assert_eq!(ty(ok), TypeArena::basic(BasicKind::Bool));
}

#[test]
fn test_named_type_sizes() {
    let (file, info) = check(
        "package p\ntype Big struct{ buf [1024]*int }\ntype Alias = Big\nfunc f(b Alias) {}\n",
    );
    let func = file.file.funcs().next().unwrap();
    let param = &func.ty.params.fields[0].names[0];
    let ty = info.object(info.object_of(param).unwrap()).unwrap().ty;
    assert_eq!(Sizes::default().size_of(&info.types, ty), Some(8192));
}

#[test]
fn test_type_switch_binding_per_clause() {
    let (file, info) = check(
        "package p\nfunc f(x interface{}) {\n\tswitch v := x.(type) {\n\tcase int:\n\t\t_ = v\n\tdefault:\n\t\t_ = v\n\t}\n}\n",
    );
    let Stmt::TypeSwitch(switch) = &func_body(&file, "f")[0] else {
        panic!("expected type switch");
    };
    let int_clause = info.implicits[&switch.clauses[0].id];
    let default_clause = info.implicits[&switch.clauses[1].id];
    assert_eq!(
        info.object(int_clause).unwrap().ty,
        TypeArena::basic(BasicKind::Int)
    );
    assert!(info.types.is_interface(info.object(default_clause).unwrap().ty));
}

#[test]
fn test_shadowed_variable_gets_new_object() {
    let (file, info) = check(
        "package p\nfunc f() {\n\tx := 1\n\tif true {\n\t\tx := \"s\"\n\t\t_ = x\n\t}\n}\n",
    );
    let body = func_body(&file, "f");
    let Stmt::Assign(outer) = &body[0] else {
        panic!("expected assignment");
    };
    let Stmt::If(stmt) = &body[1] else {
        panic!("expected if");
    };
    let Stmt::Assign(inner) = &stmt.body.stmts[0] else {
        panic!("expected assignment");
    };
    let outer = info.object_of(outer.lhs[0].as_ident().unwrap()).unwrap();
    let inner = info.object_of(inner.lhs[0].as_ident().unwrap()).unwrap();
    assert_ne!(outer, inner);
    assert_eq!(
        info.object(inner).unwrap().ty,
        TypeArena::basic(BasicKind::String)
    );
}
