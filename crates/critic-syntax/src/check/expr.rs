//! Expression typing and constant folding

use super::lookup::{lookup_field_or_method, Found};
use super::object::ObjectKind;
use super::{Checker, Mode, Selection, SelectionKind};
use crate::ast::*;
use crate::types::{BasicKind, ConstValue, Signature, Type, TypeArena, TypeId};

#[derive(Debug, Clone)]
pub(crate) struct Operand {
    pub mode: Mode,
    pub ty: TypeId,
    pub value: Option<ConstValue>,
}

impl Operand {
    pub(crate) fn invalid() -> Self {
        Self::value(TypeArena::invalid())
    }

    fn value(ty: TypeId) -> Self {
        Self {
            mode: Mode::Value,
            ty,
            value: None,
        }
    }

    fn with_mode(mode: Mode, ty: TypeId) -> Self {
        Self {
            mode,
            ty,
            value: None,
        }
    }

    fn constant(ty: TypeId, value: Option<ConstValue>) -> Self {
        let mode = if value.is_some() {
            Mode::Constant
        } else {
            Mode::Value
        };
        Self { mode, ty, value }
    }
}

/// Ordering of untyped numeric kinds: mixing two picks the later one.
fn untyped_rank(kind: BasicKind) -> u8 {
    match kind {
        BasicKind::UntypedInt => 1,
        BasicKind::UntypedRune => 2,
        BasicKind::UntypedFloat => 3,
        _ => 0,
    }
}

impl Checker {
    /// Type `expr` and record the result. `hint` is the type expected by
    /// the context; it types elided composite literals.
    pub(crate) fn expr(&mut self, expr: &Expr, hint: Option<TypeId>) -> Operand {
        match self.expr_inner(expr, hint) {
            Some(operand) => {
                self.record(expr.id(), operand.mode, operand.ty, operand.value.clone());
                operand
            }
            None => Operand::invalid(),
        }
    }

    pub(crate) fn is_untyped(&self, ty: TypeId) -> bool {
        self.info
            .types
            .basic_kind(ty)
            .is_some_and(BasicKind::is_untyped)
    }

    /// Give untyped sub-expressions of `expr` the type `target` they are
    /// implicitly converted to.
    pub(crate) fn update_untyped(&mut self, expr: &Expr, target: TypeId) {
        if self.is_untyped(target) || self.info.types.is_invalid(target) {
            return;
        }
        let Some(tv) = self.info.exprs.get_mut(&expr.id()) else {
            return;
        };
        let untyped = self
            .info
            .types
            .basic_kind(tv.ty)
            .is_some_and(|kind| kind.is_untyped() && kind != BasicKind::UntypedNil);
        if !untyped || !self.recording {
            return;
        }
        tv.ty = target;
        match expr {
            Expr::Paren(paren) => self.update_untyped(&paren.x, target),
            Expr::Unary(unary) if !matches!(unary.op, UnaryOp::Addr | UnaryOp::Recv) => {
                self.update_untyped(&unary.x, target)
            }
            Expr::Binary(binary) if !binary.op.is_comparison() => {
                self.update_untyped(&binary.x, target);
                if !matches!(binary.op, BinaryOp::Shl | BinaryOp::Shr) {
                    self.update_untyped(&binary.y, target);
                }
            }
            _ => {}
        }
    }

    fn expr_inner(&mut self, expr: &Expr, hint: Option<TypeId>) -> Option<Operand> {
        let operand = match expr {
            Expr::Ident(ident) => return self.ident(ident),
            Expr::BasicLit(lit) => {
                let kind = match lit.kind {
                    LitKind::Int => BasicKind::UntypedInt,
                    LitKind::Float => BasicKind::UntypedFloat,
                    LitKind::Char => BasicKind::UntypedRune,
                    LitKind::String => BasicKind::UntypedString,
                    LitKind::Imag => BasicKind::Complex128,
                };
                Operand::constant(
                    TypeArena::basic(kind),
                    ConstValue::from_literal(lit.kind, &lit.value),
                )
            }
            Expr::CompositeLit(lit) => self.composite_lit(lit, hint),
            Expr::FuncLit(lit) => {
                let sig = self.signature(&lit.ty);
                self.func_body(None, &lit.ty, &lit.body, sig);
                Operand::value(sig)
            }
            Expr::Paren(paren) => self.expr(&paren.x, hint),
            Expr::Selector(sel) => return self.selector(sel),
            Expr::Index(index) => self.index(index),
            Expr::Slice(slice) => self.slice_expr(slice),
            Expr::TypeAssert(assert) => {
                self.expr(&assert.x, None);
                let ty = assert.ty.as_ref()?;
                let ty = self.resolve_type(ty);
                Operand::with_mode(Mode::CommaOk, ty)
            }
            Expr::Call(call) => self.call(call),
            Expr::Star(star) => {
                let x = self.expr(&star.x, None);
                if x.mode == Mode::TypeExpr {
                    let ptr = self.info.types.pointer(x.ty);
                    Operand::with_mode(Mode::TypeExpr, ptr)
                } else {
                    match self.info.types.pointer_elem(x.ty) {
                        Some(elem) => Operand::with_mode(Mode::Variable, elem),
                        None => Operand::invalid(),
                    }
                }
            }
            Expr::Unary(unary) => self.unary(unary, hint),
            Expr::Binary(binary) => self.binary(binary),
            Expr::KeyValue(kv) => {
                self.expr(&kv.value, hint);
                return None;
            }
            Expr::Type(operand) => {
                let ty = self.resolve_type(&operand.ty);
                Operand::with_mode(Mode::TypeExpr, ty)
            }
        };
        Some(operand)
    }

    fn ident(&mut self, ident: &Ident) -> Option<Operand> {
        if ident.is_blank() {
            return None;
        }
        let id = self.lookup(&ident.name)?;
        self.info.uses.insert(ident.id, id);
        let obj = self.obj(id);
        let operand = match &obj.kind {
            ObjectKind::Var => Operand::with_mode(Mode::Variable, obj.ty),
            ObjectKind::Const(_) if obj.name == "iota" && obj.pkg.is_none() => {
                Operand::constant(obj.ty, self.iota.map(ConstValue::Int))
            }
            ObjectKind::Const(value) => Operand::constant(obj.ty, value.clone()),
            ObjectKind::TypeName => Operand::with_mode(Mode::TypeExpr, obj.ty),
            ObjectKind::Func | ObjectKind::External => Operand::value(obj.ty),
            ObjectKind::Builtin => Operand::with_mode(Mode::Builtin, TypeArena::invalid()),
            ObjectKind::Nil => Operand::value(obj.ty),
            ObjectKind::PkgName { .. } => return None,
        };
        Some(operand)
    }

    fn composite_lit(&mut self, lit: &CompositeLit, hint: Option<TypeId>) -> Operand {
        let mut open_array = None;
        let ty = match lit.ty.as_deref() {
            Some(Expr::Type(TypeOperand {
                ty:
                    TypeExpr {
                        kind: TypeExprKind::Array { len: None, elem },
                        ..
                    },
                ..
            })) => {
                let elem = self.resolve_type(elem);
                open_array = Some(elem);
                TypeArena::invalid()
            }
            Some(ty) => self.type_expr_of(ty),
            // `{...}` elided inside `[]*T{...}` stands for `&T{...}`.
            None => hint
                .map(|hint| self.info.types.pointer_elem(hint).unwrap_or(hint))
                .unwrap_or_else(TypeArena::invalid),
        };

        let under = self.info.types.underlying(ty);
        let shape = match open_array {
            Some(elem) => Type::Slice(elem),
            None => self.info.types.get(under).clone(),
        };

        let mut len: u64 = 0;
        let mut next: u64 = 0;
        for (i, elt) in lit.elts.iter().enumerate() {
            match (&shape, elt) {
                (Type::Struct(fields), Expr::KeyValue(kv)) => {
                    let field = kv
                        .key
                        .as_ident()
                        .and_then(|key| fields.iter().find(|f| f.name == key.name));
                    let field_ty = field.map(|f| f.ty);
                    self.element(&kv.value, field_ty);
                }
                (Type::Struct(fields), _) => {
                    let field_ty = fields.get(i).map(|f| f.ty);
                    self.element(elt, field_ty);
                }
                (Type::Array { elem, .. } | Type::Slice(elem), _) => {
                    let value = match elt {
                        Expr::KeyValue(kv) => {
                            let key = self.expr(&kv.key, None);
                            if let Some(index) = key.value.and_then(|v| v.as_int()) {
                                next = u64::try_from(index).unwrap_or(next);
                            }
                            &*kv.value
                        }
                        _ => elt,
                    };
                    self.element(value, Some(*elem));
                    next += 1;
                    len = len.max(next);
                }
                (Type::Map { key, value }, Expr::KeyValue(kv)) => {
                    self.element(&kv.key, Some(*key));
                    self.element(&kv.value, Some(*value));
                }
                (_, Expr::KeyValue(kv)) => {
                    self.expr(&kv.value, None);
                }
                (_, _) => {
                    self.expr(elt, None);
                }
            }
        }

        let ty = match open_array {
            Some(elem) => self.info.types.intern(Type::Array { len, elem }),
            None => ty,
        };
        Operand::value(ty)
    }

    fn element(&mut self, expr: &Expr, ty: Option<TypeId>) {
        self.expr(expr, ty);
        if let Some(ty) = ty {
            self.update_untyped(expr, ty);
        }
    }

    fn selector(&mut self, sel: &SelectorExpr) -> Option<Operand> {
        if let Some(ident) = sel.x.as_ident() {
            if let Some(path) = self.package_path_of(ident) {
                if path == "unsafe" && sel.sel.name == "Pointer" {
                    return Some(Operand::with_mode(
                        Mode::TypeExpr,
                        TypeArena::basic(BasicKind::UnsafePointer),
                    ));
                }
                let obj = self.external(&path, &sel.sel.name, sel.sel.span);
                self.info.uses.insert(sel.sel.id, obj);
                return Some(Operand::invalid());
            }
        }

        let x = self.expr(&sel.x, None);
        if self.info.types.is_invalid(x.ty) {
            return Some(Operand::invalid());
        }
        let found = lookup_field_or_method(
            &self.info.types,
            &self.info.objects,
            x.ty,
            &sel.sel.name,
        )?;

        let (kind, obj, ty, indirect, mode) = match found {
            Found::Method { obj, ty, indirect } if x.mode == Mode::TypeExpr => {
                // Method expression: the receiver becomes the first parameter.
                let ty = match self.info.types.signature(ty).cloned() {
                    Some(sig) => {
                        let mut params = vec![x.ty];
                        params.extend(sig.params);
                        self.info.types.intern(Type::Signature(Signature {
                            params,
                            results: sig.results,
                            variadic: sig.variadic,
                        }))
                    }
                    None => TypeArena::invalid(),
                };
                (SelectionKind::MethodExpr, obj, ty, indirect, Mode::Value)
            }
            Found::Method { obj, ty, indirect } => {
                (SelectionKind::MethodVal, obj, ty, indirect, Mode::Value)
            }
            Found::Field { ty, indirect } => {
                let mode = if indirect || x.mode == Mode::Variable {
                    Mode::Variable
                } else {
                    Mode::Value
                };
                (SelectionKind::FieldVal, None, ty, indirect, mode)
            }
        };
        if let Some(obj) = obj {
            self.info.uses.insert(sel.sel.id, obj);
        }
        self.info.selections.insert(
            sel.id,
            Selection {
                kind,
                recv: x.ty,
                name: sel.sel.name.clone(),
                obj,
                ty,
                indirect,
            },
        );
        Some(Operand::with_mode(mode, ty))
    }

    /// Underlying type with a pointer to an array dereferenced.
    fn indexable(&self, ty: TypeId) -> Type {
        let under = self.info.types.underlying(ty);
        match self.info.types.get(under) {
            Type::Pointer(elem) => {
                let elem_under = self.info.types.underlying(*elem);
                match self.info.types.get(elem_under) {
                    array @ Type::Array { .. } => array.clone(),
                    _ => Type::Pointer(*elem),
                }
            }
            other => other.clone(),
        }
    }

    fn index(&mut self, index: &IndexExpr) -> Operand {
        let x = self.expr(&index.x, None);
        match self.indexable(x.ty) {
            Type::Basic(kind) if kind.is_string() => {
                let i = self.expr(&index.index, None);
                let byte = TypeArena::basic(BasicKind::Uint8);
                let value = match (&x.value, i.value.and_then(|v| v.as_int())) {
                    (Some(ConstValue::String(s)), Some(i)) => usize::try_from(i)
                        .ok()
                        .and_then(|i| s.as_bytes().get(i))
                        .map(|b| ConstValue::Int(i128::from(*b))),
                    _ => None,
                };
                Operand::constant(byte, value)
            }
            Type::Array { elem, .. } | Type::Slice(elem) => {
                self.element(&index.index, Some(TypeArena::basic(BasicKind::Int)));
                Operand::with_mode(Mode::Variable, elem)
            }
            Type::Map { key, value } => {
                self.element(&index.index, Some(key));
                Operand::with_mode(Mode::MapIndex, value)
            }
            _ => {
                self.expr(&index.index, None);
                Operand::invalid()
            }
        }
    }

    fn slice_expr(&mut self, slice: &SliceExpr) -> Operand {
        let x = self.expr(&slice.x, None);
        for bound in [&slice.low, &slice.high, &slice.max].into_iter().flatten() {
            self.element(bound, Some(TypeArena::basic(BasicKind::Int)));
        }
        match self.indexable(x.ty) {
            Type::Basic(kind) if kind.is_string() => {
                Operand::value(TypeArena::basic(BasicKind::String))
            }
            Type::Array { elem, .. } => {
                let slice = self.info.types.slice(elem);
                Operand::value(slice)
            }
            Type::Slice(_) => Operand::value(x.ty),
            _ => Operand::invalid(),
        }
    }

    fn call(&mut self, call: &CallExpr) -> Operand {
        let fun = self.expr(&call.fun, None);
        match fun.mode {
            Mode::TypeExpr => {
                let Some(arg) = call.args.first() else {
                    return Operand::value(fun.ty);
                };
                let x = self.expr(arg, Some(fun.ty));
                self.update_untyped(arg, fun.ty);
                for extra in &call.args[1..] {
                    self.expr(extra, None);
                }
                let value = x.value.and_then(|v| self.convert_const(&v, fun.ty));
                Operand::constant(fun.ty, value)
            }
            Mode::Builtin => {
                let name = call
                    .fun
                    .unparen()
                    .as_ident()
                    .map(|ident| ident.name.clone())
                    .unwrap_or_default();
                self.builtin(&name, call)
            }
            _ => {
                let Some(sig) = self.info.types.signature(fun.ty).cloned() else {
                    for arg in &call.args {
                        self.expr(arg, None);
                    }
                    return Operand::invalid();
                };
                for (i, arg) in call.args.iter().enumerate() {
                    let param = self.param_type(&sig, i, call.ellipsis);
                    self.element(arg, param);
                }
                match sig.results.as_slice() {
                    [] => Operand::with_mode(Mode::NoValue, TypeArena::invalid()),
                    [single] => Operand::value(*single),
                    many => {
                        let tuple = self.info.types.tuple(many.to_vec());
                        Operand::value(tuple)
                    }
                }
            }
        }
    }

    /// Type expected for argument `i`, unpacking the variadic slice.
    fn param_type(&self, sig: &Signature, i: usize, ellipsis: bool) -> Option<TypeId> {
        let last = sig.params.len().checked_sub(1)?;
        if sig.variadic && i >= last {
            let variadic = sig.params[last];
            if ellipsis {
                return Some(variadic);
            }
            return match self.info.types.get(variadic) {
                Type::Slice(elem) => Some(*elem),
                _ => None,
            };
        }
        sig.params.get(i).copied()
    }

    fn builtin(&mut self, name: &str, call: &CallExpr) -> Operand {
        let int = TypeArena::basic(BasicKind::Int);
        let args = &call.args;
        match name {
            "len" | "cap" => {
                let Some(arg) = args.first() else {
                    return Operand::value(int);
                };
                let x = self.expr(arg, None);
                let value = match &x.value {
                    Some(ConstValue::String(s)) if name == "len" => {
                        Some(ConstValue::Int(s.len() as i128))
                    }
                    _ => None,
                };
                Operand::constant(int, value)
            }
            "new" => {
                let ty = args
                    .first()
                    .map_or(TypeArena::invalid(), |arg| self.type_expr_of(arg));
                let ptr = self.info.types.pointer(ty);
                Operand::value(ptr)
            }
            "make" => {
                let ty = args
                    .first()
                    .map_or(TypeArena::invalid(), |arg| self.type_expr_of(arg));
                for arg in args.iter().skip(1) {
                    self.element(arg, Some(int));
                }
                Operand::value(ty)
            }
            "append" => {
                let Some(first) = args.first() else {
                    return Operand::invalid();
                };
                let slice = self.expr(first, None);
                let elem = match self.info.types.get(self.info.types.underlying(slice.ty)) {
                    Type::Slice(elem) if !call.ellipsis => Some(*elem),
                    _ => None,
                };
                for arg in args.iter().skip(1) {
                    self.element(arg, elem);
                }
                if self.is_untyped(slice.ty) {
                    Operand::invalid()
                } else {
                    Operand::value(slice.ty)
                }
            }
            "copy" => {
                for arg in args {
                    self.expr(arg, None);
                }
                Operand::value(int)
            }
            "recover" => {
                let any = self.info.types.intern(Type::Interface(Vec::new()));
                Operand::value(any)
            }
            "complex" | "real" | "imag" => {
                for arg in args {
                    self.expr(arg, None);
                }
                let kind = if name == "complex" {
                    BasicKind::Complex128
                } else {
                    BasicKind::Float64
                };
                Operand::value(TypeArena::basic(kind))
            }
            "min" | "max" => self.min_max(name == "min", args),
            _ => {
                for arg in args {
                    self.expr(arg, None);
                }
                Operand::with_mode(Mode::NoValue, TypeArena::invalid())
            }
        }
    }

    fn min_max(&mut self, min: bool, args: &[Expr]) -> Operand {
        let operands: Vec<Operand> = args.iter().map(|arg| self.expr(arg, None)).collect();
        let ty = operands
            .iter()
            .map(|op| op.ty)
            .find(|ty| !self.is_untyped(*ty))
            .or_else(|| operands.first().map(|op| op.ty))
            .unwrap_or_else(TypeArena::invalid);
        for arg in args {
            self.update_untyped(arg, ty);
        }
        let op = if min { BinaryOp::Lss } else { BinaryOp::Gtr };
        let mut best: Option<ConstValue> = None;
        for operand in &operands {
            let Some(value) = &operand.value else {
                return Operand::value(ty);
            };
            let better = match &best {
                None => true,
                Some(current) => ConstValue::binary(op, value, current, false)
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            };
            if better {
                best = Some(value.clone());
            }
        }
        Operand::constant(ty, best)
    }

    fn unary(&mut self, unary: &UnaryExpr, hint: Option<TypeId>) -> Operand {
        match unary.op {
            UnaryOp::Addr => {
                let inner_hint = hint.and_then(|h| self.info.types.pointer_elem(h));
                let x = self.expr(&unary.x, inner_hint);
                if self.info.types.is_invalid(x.ty) {
                    return Operand::invalid();
                }
                let ptr = self.info.types.pointer(x.ty);
                Operand::value(ptr)
            }
            UnaryOp::Recv => {
                let x = self.expr(&unary.x, None);
                match self.info.types.get(self.info.types.underlying(x.ty)) {
                    Type::Chan { elem, .. } => Operand::with_mode(Mode::CommaOk, *elem),
                    _ => Operand::invalid(),
                }
            }
            op => {
                let x = self.expr(&unary.x, hint);
                let value = x.value.and_then(|v| ConstValue::unary(op, &v));
                Operand::constant(x.ty, value)
            }
        }
    }

    fn binary(&mut self, binary: &BinaryExpr) -> Operand {
        let x = self.expr(&binary.x, None);
        let y = self.expr(&binary.y, None);
        let types = &self.info.types;

        if matches!(binary.op, BinaryOp::Shl | BinaryOp::Shr) {
            let value = match (&x.value, &y.value) {
                (Some(a), Some(b)) => ConstValue::binary(binary.op, a, b, true),
                _ => None,
            };
            return Operand::constant(x.ty, value);
        }

        let x_untyped = self.is_untyped(x.ty);
        let y_untyped = self.is_untyped(y.ty);
        let ty = match (x_untyped, y_untyped) {
            (true, false) => y.ty,
            (false, _) => x.ty,
            (true, true) => {
                let (a, b) = (types.basic_kind(x.ty), types.basic_kind(y.ty));
                match (a, b) {
                    (Some(a), Some(b)) if untyped_rank(b) > untyped_rank(a) => y.ty,
                    _ => x.ty,
                }
            }
        };
        if x_untyped {
            self.update_untyped(&binary.x, ty);
        }
        if y_untyped {
            self.update_untyped(&binary.y, ty);
        }

        let integer = self
            .info
            .types
            .underlying_basic(ty)
            .is_some_and(BasicKind::is_integer);
        let value = match (&x.value, &y.value) {
            (Some(a), Some(b)) => ConstValue::binary(binary.op, a, b, integer),
            _ => None,
        };
        if binary.op.is_comparison() {
            return Operand::constant(TypeArena::basic(BasicKind::UntypedBool), value);
        }
        Operand::constant(ty, value)
    }
}
