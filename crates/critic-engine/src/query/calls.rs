//! Call and selector naming

use critic_syntax::ast::{CallExpr, Expr, SelectorExpr};
use critic_syntax::flow::CallInstr;
use critic_syntax::{Callee, Instruction, Object, ObjectKind};

use crate::model::Program;

/// Qualified name of the statically known function `call` invokes:
/// `path.Func`, `(path.T).Method`, `(*path.T).Method`, or the bare name of
/// a builtin.
///
/// Calls through function values, interface methods and conversions have
/// no static name and yield `None`. Parentheses around the callee are not
/// looked through.
pub fn call_name(program: &Program<'_>, call: &CallExpr) -> Option<String> {
    let obj = match call.fun.as_ref() {
        Expr::Selector(sel) => program.object_of(&sel.sel)?,
        Expr::Ident(ident) => program.object_of(ident)?,
        _ => return None,
    };
    match obj.kind {
        ObjectKind::Func | ObjectKind::External => Some(obj.full_name(program.types())),
        ObjectKind::Builtin if matches!(call.fun.as_ref(), Expr::Ident(_)) => {
            Some(obj.name.clone())
        }
        _ => None,
    }
}

/// Returns true if `expr` is a call to the function named `name`.
pub fn is_call_to(program: &Program<'_>, expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Call(call) => call_name(program, call).is_some_and(|n| n == name),
        _ => false,
    }
}

/// Returns true if `expr` is a call to any of `names`.
pub fn is_call_to_any(program: &Program<'_>, expr: &Expr, names: &[&str]) -> bool {
    let Expr::Call(call) = expr else {
        return false;
    };
    call_name(program, call).is_some_and(|name| names.contains(&name.as_str()))
}

/// Flow-form counterpart of [`call_name`]. Interface invocations and calls
/// of function values have no name.
pub fn flow_call_name(program: &Program<'_>, call: &CallInstr) -> Option<String> {
    match &call.callee {
        Callee::Function(id) => {
            let obj = program.object(*id)?;
            match obj.kind {
                ObjectKind::Func | ObjectKind::External => Some(obj.full_name(program.types())),
                _ => None,
            }
        }
        Callee::Builtin(name) => Some(name.clone()),
        Callee::Invoke { .. } | Callee::Value => None,
    }
}

/// Qualified name of a selector: `(recv).name` for field and method
/// selections, `path.name` for package members.
///
/// Any other selector, including one on a local variable of unknown type,
/// yields `None`.
pub fn selector_name(program: &Program<'_>, sel: &SelectorExpr) -> Option<String> {
    if let Some(selection) = program.selection(sel.id) {
        return Some(format!(
            "({}).{}",
            program.render_type(selection.recv),
            selection.name
        ));
    }
    let Expr::Ident(x) = sel.x.as_ref() else {
        return None;
    };
    match program.object_of(x).map(|obj| &obj.kind) {
        Some(ObjectKind::PkgName { path }) => Some(format!("{}.{}", path, sel.sel.name)),
        _ => None,
    }
}

/// Returns true if `obj` is the package-level object `name`, written as
/// `path.Name`.
pub fn is_object(obj: &Object, name: &str) -> bool {
    match &obj.pkg {
        Some(pkg) => {
            name.len() == pkg.len() + 1 + obj.name.len()
                && name.starts_with(pkg.as_str())
                && name[pkg.len()..].starts_with('.')
                && name.ends_with(obj.name.as_str())
        }
        // Universe objects have no package.
        None => obj.name == name,
    }
}

/// Render call arguments as source, separated by `, `.
pub fn render_args(program: &Program<'_>, args: &[Expr]) -> String {
    args.iter()
        .map(|arg| program.render_expr(arg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instructions with the debug references removed.
pub fn filter_debug(instrs: &[Instruction]) -> Vec<&Instruction> {
    instrs
        .iter()
        .filter(|instr| !matches!(instr, Instruction::DebugRef { .. }))
        .collect()
}
