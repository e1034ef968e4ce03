use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
};

use crate::{
    error::{range_error, type_error, Result},
    resource::ResourceHandle,
};

/// Quill's dynamically-typed value
///
/// Arrays, strings, bytes, and maps have eager copy semantics: cloning a `QValue` deep-copies
/// their contents. `Resource` is the only variant that shares state across clones, via the
/// reference-counted [ResourceHandle] it wraps.
#[derive(Clone, Debug, Default)]
pub enum QValue {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    Bytes(Vec<u8>),
    Array(Vec<QValue>),
    Map(BTreeMap<QValue, QValue>),
    Resource(ResourceHandle),
}

impl QValue {
    /// Returns the name of this value's type, as reported by the `typeof` host function
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "nil",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Resource(_) => "resource",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Null and numeric zero are false; everything else (including empty String, Array, and
    /// Map) is true. This is a deliberate deviation from a C-like "empty is falsy" convention.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            _ => true,
        }
    }

    /// `+`: numeric addition with Float promotion, String/Bytes concatenation
    pub fn add(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => {
                let mut out = a.clone();
                out.extend_from_slice(b);
                Ok(Self::Str(out))
            }
            (Self::Bytes(a), Self::Bytes(b)) => {
                let mut out = a.clone();
                out.extend_from_slice(b);
                Ok(Self::Bytes(out))
            }
            _ => self.numeric_binary(other, "+", |a, b| a + b, |a, b| a + b),
        }
    }

    /// `+=`: like `add`, but String/Bytes additionally accept a numeric right-hand side —
    /// appended as its textual form for String, as a single low byte for Bytes.
    pub fn add_assign(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Str(a), Self::Int(_) | Self::Float(_)) => {
                let mut out = a.clone();
                out.extend_from_slice(other.to_display_string().as_bytes());
                Ok(Self::Str(out))
            }
            (Self::Bytes(a), Self::Int(i)) => {
                let mut out = a.clone();
                out.push(*i as u8);
                Ok(Self::Bytes(out))
            }
            _ => self.add(other),
        }
    }

    /// `-`
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.numeric_binary(other, "-", |a, b| a - b, |a, b| a - b)
    }

    /// `*`
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.numeric_binary(other, "*", |a, b| a * b, |a, b| a * b)
    }

    /// `/`: integer division truncates toward zero; divide-by-zero is a runtime error
    pub fn div(&self, other: &Self) -> Result<Self> {
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            if !matches!(self, Self::Float(_)) && !matches!(other, Self::Float(_)) {
                if b == 0 {
                    return range_error("division by zero");
                }
                return Ok(Self::Int(a / b));
            }
        }
        self.numeric_binary(other, "/", |a, b| a / b, |a, b| a / b)
    }

    /// `%`: requires two Integers
    pub fn rem(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => {
                if *b == 0 {
                    range_error("division by zero")
                } else {
                    Ok(Self::Int(a % b))
                }
            }
            _ => type_error("two Integers", other),
        }
    }

    fn numeric_binary(
        &self,
        other: &Self,
        op: &str,
        int_op: impl Fn(i64, i64) -> i64,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(int_op(*a, *b))),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                Ok(Self::Float(float_op(self.as_f64().unwrap(), other.as_f64().unwrap())))
            }
            _ => {
                let _ = op;
                type_error_pair(self, other)
            }
        }
    }

    /// Unary `-`
    pub fn negate(&self) -> Result<Self> {
        match self {
            Self::Int(i) => Ok(Self::Int(-i)),
            Self::Float(f) => Ok(Self::Float(-f)),
            _ => type_error("Integer or Float", self),
        }
    }

    /// Logical `!`: returns Integer 0/1 from any value's truthiness
    pub fn not(&self) -> Self {
        Self::Int(if self.is_truthy() { 0 } else { 1 })
    }

    fn as_bitwise(&self) -> Result<i64> {
        match self.as_i64() {
            Some(i) => Ok(i),
            None => type_error("Integer", self),
        }
    }

    /// `&`
    pub fn bit_and(&self, other: &Self) -> Result<Self> {
        Ok(Self::Int(self.as_bitwise()? & other.as_bitwise()?))
    }

    /// `|`
    pub fn bit_or(&self, other: &Self) -> Result<Self> {
        Ok(Self::Int(self.as_bitwise()? | other.as_bitwise()?))
    }

    /// `^`
    pub fn bit_xor(&self, other: &Self) -> Result<Self> {
        Ok(Self::Int(self.as_bitwise()? ^ other.as_bitwise()?))
    }

    /// `<<`
    pub fn shift_left(&self, other: &Self) -> Result<Self> {
        Ok(Self::Int(self.as_bitwise()?.wrapping_shl(other.as_bitwise()? as u32)))
    }

    /// `>>`
    pub fn shift_right(&self, other: &Self) -> Result<Self> {
        Ok(Self::Int(self.as_bitwise()?.wrapping_shr(other.as_bitwise()? as u32)))
    }

    /// `~`
    pub fn bit_not(&self) -> Result<Self> {
        Ok(Self::Int(!self.as_bitwise()?))
    }

    /// Numeric/lexicographic comparison for `<`, `<=`, `>`, `>=`
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => Ok(a.total_cmp(&b)),
            _ => match (self, other) {
                (Self::Str(a), Self::Str(b)) => Ok(a.cmp(b)),
                _ => type_error_pair(self, other),
            },
        }
    }

    /// `==`/`!=`
    pub fn values_equal(&self, other: &Self) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => return a == b,
            _ => {}
        }
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Resource(a), Self::Resource(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.values_equal(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ak, av), (bk, bv))| ak == bk && av.values_equal(bv))
            }
            _ => false,
        }
    }

    /// `v[i]`
    pub fn index_get(&self, index: &Self) -> Result<Self> {
        match self {
            Self::Str(bytes) | Self::Bytes(bytes) => {
                let i = index_in_range(index, bytes.len())?;
                Ok(Self::Int(bytes[i] as i64))
            }
            Self::Array(items) => {
                let i = index_in_range(index, items.len())?;
                Ok(items[i].clone())
            }
            Self::Map(map) => Ok(map.get(index).cloned().unwrap_or(Self::Null)),
            _ => type_error("String, Bytes, Array, or Map", self),
        }
    }

    /// `v[i] = x`
    pub fn index_set(&mut self, index: &Self, value: Self) -> Result<()> {
        match self {
            Self::Str(bytes) | Self::Bytes(bytes) => {
                let i = index_in_range(index, bytes.len())?;
                let Self::Int(byte) = value else {
                    return type_error("Integer", &value);
                };
                bytes[i] = byte as u8;
                Ok(())
            }
            Self::Array(items) => {
                let i = index_in_range(index, items.len())?;
                items[i] = value;
                Ok(())
            }
            Self::Map(map) => {
                map.insert(index.clone(), value);
                Ok(())
            }
            _ => type_error("String, Bytes, Array, or Map", self),
        }
    }

    /// `v[from:to]`
    pub fn slice(&self, from: Option<i64>, to: Option<i64>) -> Result<Self> {
        match self {
            Self::Str(bytes) => Ok(Self::Str(slice_bytes(bytes, from, to)?)),
            Self::Bytes(bytes) => Ok(Self::Bytes(slice_bytes(bytes, from, to)?)),
            Self::Array(items) => {
                let (start, end) = slice_bounds(items.len(), from, to)?;
                Ok(Self::Array(items[start..end].to_vec()))
            }
            _ => type_error("String, Bytes, or Array", self),
        }
    }

    /// Defined for String, Bytes, Array, Map
    pub fn length(&self) -> Result<usize> {
        match self {
            Self::Str(b) | Self::Bytes(b) => Ok(b.len()),
            Self::Array(items) => Ok(items.len()),
            Self::Map(map) => Ok(map.len()),
            _ => type_error("String, Bytes, Array, or Map", self),
        }
    }

    /// Human-readable rendering; hex dump for Bytes, `[e1,e2,...]` for Array, `{k1:v1,...}` for Map
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => "nil".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f}"),
            Self::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Bytes(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
            Self::Array(items) => {
                let parts: Vec<String> = items.iter().map(Self::to_display_string).collect();
                format!("[{}]", parts.join(","))
            }
            Self::Map(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.to_display_string(), v.to_display_string()))
                    .collect();
                format!("{{{}}}", parts.join(","))
            }
            Self::Resource(_) => "resource".to_string(),
        }
    }
}

fn type_error_pair<T>(lhs: &QValue, rhs: &QValue) -> Result<T> {
    type_error(&format!("operands compatible with {}", lhs.type_name()), rhs)
}

fn index_in_range(index: &QValue, len: usize) -> Result<usize> {
    let QValue::Int(i) = index else {
        return type_error("Integer", index);
    };
    match usize::try_from(*i) {
        Ok(i) if i < len => Ok(i),
        _ => range_error(format!("index {i} out of range for length {len}")),
    }
}

fn resolve_bound(bound: Option<i64>, default: usize) -> Result<usize> {
    match bound {
        None => Ok(default),
        Some(i) => match usize::try_from(i) {
            Ok(i) => Ok(i),
            Err(_) => range_error(format!("slice bound {i} out of range")),
        },
    }
}

fn slice_bounds(len: usize, from: Option<i64>, to: Option<i64>) -> Result<(usize, usize)> {
    let from = resolve_bound(from, 0)?;
    let to = resolve_bound(to, len)?;
    if from > to || to > len {
        return range_error(format!("slice [{from}:{to}] out of range for length {len}"));
    }
    Ok((from, to))
}

fn slice_bytes(bytes: &[u8], from: Option<i64>, to: Option<i64>) -> Result<Vec<u8>> {
    let (start, end) = slice_bounds(bytes.len(), from, to)?;
    Ok(bytes[start..end].to_vec())
}

impl PartialEq for QValue {
    fn eq(&self, other: &Self) -> bool {
        self.values_equal(other)
    }
}
impl Eq for QValue {}

/// Total order across all variants, used so `QValue` can key a `BTreeMap`
///
/// Ranking: `Null < numeric < Str < Bytes < Array < Map < Resource`. Numeric values compare
/// cross-type via `f64::total_cmp` so `1` and `1.0` collide as map keys, matching spec's
/// "ordered by `<`" requirement for a total order over comparable variants.
impl Ord for QValue {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &QValue) -> u8 {
            match v {
                QValue::Null => 0,
                QValue::Int(_) | QValue::Float(_) => 1,
                QValue::Str(_) => 2,
                QValue::Bytes(_) => 3,
                QValue::Array(_) => 4,
                QValue::Map(_) => 5,
                QValue::Resource(_) => 6,
            }
        }

        match (self, other) {
            (QValue::Null, QValue::Null) => Ordering::Equal,
            (QValue::Int(_) | QValue::Float(_), QValue::Int(_) | QValue::Float(_)) => {
                self.as_f64().unwrap().total_cmp(&other.as_f64().unwrap())
            }
            (QValue::Str(a), QValue::Str(b)) => a.cmp(b),
            (QValue::Bytes(a), QValue::Bytes(b)) => a.cmp(b),
            (QValue::Array(a), QValue::Array(b)) => a.cmp(b),
            (QValue::Map(a), QValue::Map(b)) => a.cmp(b),
            (QValue::Resource(a), QValue::Resource(b)) => a.address().cmp(&b.address()),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl PartialOrd for QValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}
