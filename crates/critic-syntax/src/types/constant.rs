//! Compile-time constant values and literal decoding

use crate::ast::{BinaryOp, LitKind, UnaryOp};
use std::fmt;

/// A constant value. Integers are kept in `i128` so that the full `uint64`
/// range fits.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    String(String),
}

impl ConstValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, also for floats with no fractional part.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            ConstValue::Int(v) => Some(*v),
            ConstValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i128),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConstValue::Int(v) => Some(*v as f64),
            ConstValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a literal from its raw source text.
    pub fn from_literal(kind: LitKind, raw: &str) -> Option<ConstValue> {
        match kind {
            LitKind::Int => parse_int(raw).map(ConstValue::Int),
            LitKind::Float => raw.replace('_', "").parse().ok().map(ConstValue::Float),
            LitKind::Char => parse_char(raw).map(ConstValue::Int),
            LitKind::String => unquote(raw).map(ConstValue::String),
            LitKind::Imag => None,
        }
    }

    pub fn unary(op: UnaryOp, x: &ConstValue) -> Option<ConstValue> {
        match (op, x) {
            (UnaryOp::Pos, ConstValue::Int(_) | ConstValue::Float(_)) => Some(x.clone()),
            (UnaryOp::Neg, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
            (UnaryOp::Neg, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
            (UnaryOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
            (UnaryOp::Xor, ConstValue::Int(v)) => Some(ConstValue::Int(!v)),
            _ => None,
        }
    }

    /// Fold a binary operation; `integer` selects truncating division.
    pub fn binary(op: BinaryOp, x: &ConstValue, y: &ConstValue, integer: bool) -> Option<ConstValue> {
        use ConstValue::*;
        if op.is_comparison() {
            return compare(op, x, y).map(Bool);
        }
        match (x, y) {
            (Bool(a), Bool(b)) => match op {
                BinaryOp::LAnd => Some(Bool(*a && *b)),
                BinaryOp::LOr => Some(Bool(*a || *b)),
                _ => None,
            },
            (String(a), String(b)) if op == BinaryOp::Add => Some(String(format!("{}{}", a, b))),
            (Int(a), Int(b)) => {
                let (a, b) = (*a, *b);
                let v = match op {
                    BinaryOp::Add => a.checked_add(b)?,
                    BinaryOp::Sub => a.checked_sub(b)?,
                    BinaryOp::Mul => a.checked_mul(b)?,
                    BinaryOp::Quo if integer => a.checked_div(b)?,
                    BinaryOp::Quo => return Some(Float(a as f64 / b as f64)).filter(|_| b != 0),
                    BinaryOp::Rem => a.checked_rem(b)?,
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    BinaryOp::Xor => a ^ b,
                    BinaryOp::AndNot => a & !b,
                    BinaryOp::Shl => a.checked_shl(u32::try_from(b).ok()?)?,
                    BinaryOp::Shr => a.checked_shr(u32::try_from(b).ok()?)?,
                    _ => return None,
                };
                Some(Int(v))
            }
            _ => {
                let (a, b) = (x.as_float()?, y.as_float()?);
                let v = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Quo if b != 0.0 => a / b,
                    _ => return None,
                };
                Some(Float(v))
            }
        }
    }
}

fn compare(op: BinaryOp, x: &ConstValue, y: &ConstValue) -> Option<bool> {
    use std::cmp::Ordering;
    let ord = match (x, y) {
        (ConstValue::Bool(a), ConstValue::Bool(b)) => {
            return match op {
                BinaryOp::Eql => Some(a == b),
                BinaryOp::Neq => Some(a != b),
                _ => None,
            }
        }
        (ConstValue::String(a), ConstValue::String(b)) => a.cmp(b),
        (ConstValue::Int(a), ConstValue::Int(b)) => a.cmp(b),
        _ => x.as_float()?.partial_cmp(&y.as_float()?)?,
    };
    Some(match op {
        BinaryOp::Eql => ord == Ordering::Equal,
        BinaryOp::Neq => ord != Ordering::Equal,
        BinaryOp::Lss => ord == Ordering::Less,
        BinaryOp::Leq => ord != Ordering::Greater,
        BinaryOp::Gtr => ord == Ordering::Greater,
        BinaryOp::Geq => ord != Ordering::Less,
        _ => return None,
    })
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{}", b),
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Float(v) => write!(f, "{}", v),
            ConstValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Decode an integer literal (`42`, `0x2A`, `0o52`, `052`, `0b101010`).
pub fn parse_int(raw: &str) -> Option<i128> {
    let text = raw.replace('_', "");
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return i128::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return i128::from_str_radix(bin, 2).ok();
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return i128::from_str_radix(oct, 8).ok();
    }
    if lower.len() > 1 && lower.starts_with('0') {
        return i128::from_str_radix(&lower[1..], 8).ok();
    }
    lower.parse().ok()
}

/// Decode a rune literal to its code point.
pub fn parse_char(raw: &str) -> Option<i128> {
    let body = raw.strip_prefix('\'')?.strip_suffix('\'')?;
    let decoded = unescape(body, '\'')?;
    let mut chars = decoded.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c as i128)
}

/// Decode an interpreted (`"..."`) or raw (`` `...` ``) string literal.
pub fn unquote(raw: &str) -> Option<String> {
    if let Some(body) = raw.strip_prefix('`').and_then(|r| r.strip_suffix('`')) {
        return Some(body.replace('\r', ""));
    }
    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body, '"')
}

fn unescape(body: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next()?;
        let decoded = match esc {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            c if c == quote => c,
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            '0'..='7' => {
                let mut value = esc.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("0x2A"), Some(42));
        assert_eq!(parse_int("0o52"), Some(42));
        assert_eq!(parse_int("052"), Some(42));
        assert_eq!(parse_int("0b101010"), Some(42));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0"), Some(0));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""a\tb\"c""#).as_deref(), Some("a\tb\"c"));
        assert_eq!(unquote("`raw\\n`").as_deref(), Some("raw\\n"));
        assert_eq!(unquote(r#""\x41é""#).as_deref(), Some("Aé"));
        assert_eq!(unquote("plain"), None);
    }

    #[test]
    fn test_parse_char() {
        assert_eq!(parse_char("'a'"), Some(97));
        assert_eq!(parse_char(r"'\n'"), Some(10));
        assert_eq!(parse_char(r"'\''"), Some(39));
    }

    #[test]
    fn test_fold_arithmetic() {
        let v = ConstValue::binary(BinaryOp::Add, &ConstValue::Int(2), &ConstValue::Int(3), true);
        assert_eq!(v, Some(ConstValue::Int(5)));
        let v = ConstValue::binary(BinaryOp::Quo, &ConstValue::Int(7), &ConstValue::Int(2), true);
        assert_eq!(v, Some(ConstValue::Int(3)));
        let v = ConstValue::binary(BinaryOp::Quo, &ConstValue::Int(1), &ConstValue::Int(0), true);
        assert_eq!(v, None);
    }

    #[test]
    fn test_fold_comparison_and_strings() {
        let v = ConstValue::binary(BinaryOp::Lss, &ConstValue::Int(1), &ConstValue::Float(1.5), false);
        assert_eq!(v, Some(ConstValue::Bool(true)));
        let v = ConstValue::binary(
            BinaryOp::Add,
            &ConstValue::String("a".into()),
            &ConstValue::String("b".into()),
            false,
        );
        assert_eq!(v, Some(ConstValue::String("ab".into())));
    }
}
