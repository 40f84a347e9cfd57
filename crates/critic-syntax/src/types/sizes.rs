//! Platform type layout (gc-compatible)

use super::{BasicKind, Type, TypeArena, TypeId};

/// Size/alignment model. Defaults to a 64-bit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizes {
    pub word_size: i64,
    pub max_align: i64,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            word_size: 8,
            max_align: 8,
        }
    }
}

fn align_up(x: i64, a: i64) -> i64 {
    if a <= 1 {
        return x;
    }
    (x + a - 1) / a * a
}

impl Sizes {
    pub fn new(word_size: i64) -> Self {
        Self {
            word_size,
            max_align: word_size,
        }
    }

    fn basic_size(&self, kind: BasicKind) -> Option<i64> {
        let size = match kind {
            BasicKind::Bool | BasicKind::Int8 | BasicKind::Uint8 => 1,
            BasicKind::Int16 | BasicKind::Uint16 => 2,
            BasicKind::Int32 | BasicKind::Uint32 | BasicKind::Float32 => 4,
            BasicKind::Int64 | BasicKind::Uint64 | BasicKind::Float64 | BasicKind::Complex64 => 8,
            BasicKind::Complex128 => 16,
            BasicKind::Int | BasicKind::Uint | BasicKind::Uintptr | BasicKind::UnsafePointer => {
                self.word_size
            }
            BasicKind::String => 2 * self.word_size,
            _ => return None,
        };
        Some(size)
    }

    /// Alignment of `ty` in bytes; None if the type is not fully known.
    pub fn align_of(&self, arena: &TypeArena, ty: TypeId) -> Option<i64> {
        self.align_inner(arena, ty, 0)
    }

    fn align_inner(&self, arena: &TypeArena, ty: TypeId, depth: usize) -> Option<i64> {
        if depth > 64 {
            return None;
        }
        let under = arena.underlying(ty);
        let align = match arena.get(under) {
            Type::Basic(BasicKind::String) => self.word_size,
            Type::Basic(BasicKind::Complex64) => 4,
            Type::Basic(BasicKind::Complex128) => 8,
            Type::Basic(kind) => self.basic_size(*kind)?,
            Type::Array { elem, .. } => self.align_inner(arena, *elem, depth + 1)?,
            Type::Struct(fields) => {
                let mut max = 1;
                for field in fields {
                    max = max.max(self.align_inner(arena, field.ty, depth + 1)?);
                }
                max
            }
            Type::Tuple(elems) => {
                let mut max = 1;
                for elem in elems {
                    max = max.max(self.align_inner(arena, *elem, depth + 1)?);
                }
                max
            }
            Type::Slice(_)
            | Type::Interface(_)
            | Type::Pointer(_)
            | Type::Map { .. }
            | Type::Chan { .. }
            | Type::Signature(_) => self.word_size,
            Type::Named(_) => return None,
        };
        Some(align.clamp(1, self.max_align))
    }

    /// Size of `ty` in bytes; None if the type is not fully known.
    pub fn size_of(&self, arena: &TypeArena, ty: TypeId) -> Option<i64> {
        self.size_inner(arena, ty, 0)
    }

    fn size_inner(&self, arena: &TypeArena, ty: TypeId, depth: usize) -> Option<i64> {
        if depth > 64 {
            return None;
        }
        let under = arena.underlying(ty);
        match arena.get(under) {
            Type::Basic(kind) => self.basic_size(*kind),
            Type::Array { len, elem } => {
                let n = i64::try_from(*len).ok()?;
                if n == 0 {
                    return Some(0);
                }
                let z = self.size_inner(arena, *elem, depth + 1)?;
                let a = self.align_inner(arena, *elem, depth + 1)?;
                align_up(z, a).checked_mul(n - 1)?.checked_add(z)
            }
            Type::Slice(_) => Some(3 * self.word_size),
            Type::Interface(_) => Some(2 * self.word_size),
            Type::Pointer(_) | Type::Map { .. } | Type::Chan { .. } | Type::Signature(_) => {
                Some(self.word_size)
            }
            Type::Struct(fields) => {
                let types: Vec<TypeId> = fields.iter().map(|f| f.ty).collect();
                self.layout(arena, &types, depth)
            }
            Type::Tuple(elems) => self.layout(arena, elems, depth),
            Type::Named(_) => None,
        }
    }

    /// Size of a sequence of fields laid out in order, padded to the
    /// overall alignment.
    fn layout(&self, arena: &TypeArena, fields: &[TypeId], depth: usize) -> Option<i64> {
        if fields.is_empty() {
            return Some(0);
        }
        let mut offset = 0i64;
        let mut max_align = 1;
        for (i, ty) in fields.iter().enumerate() {
            let a = self.align_inner(arena, *ty, depth + 1)?;
            let z = self.size_inner(arena, *ty, depth + 1)?;
            max_align = max_align.max(a);
            offset = align_up(offset, a);
            offset += z;
            // A trailing zero-size field must not point past the object.
            if i == fields.len() - 1 && z == 0 && offset > 0 {
                offset += 1;
            }
        }
        Some(align_up(offset, max_align))
    }
}
