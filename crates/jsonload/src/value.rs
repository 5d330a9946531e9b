//! JSON value types and utilities.
//!
//! A decoded document is a plain owned tree: every container exclusively
//! owns its children and dropping the root releases everything, big-number
//! handles included.

use core::fmt::{self, Write as _};

use bstr::{BString, ByteSlice};
use indexmap::IndexMap;

use crate::backend::{BigInteger, BigReal};

/// Object storage. Keys keep their first insertion position.
pub type Map = IndexMap<String, Value>;
/// Array storage.
pub type Array = Vec<Value>;

/// A decoded JSON value.
///
/// Numbers come in four flavours. [`Value::Integer`] and [`Value::Real`]
/// are the native representations; [`Value::BigInteger`] and
/// [`Value::BigReal`] only appear when a big-number mode was requested.
///
/// Strings are byte strings because `allow_nul` lets them carry `\0`.
///
/// # Examples
///
/// ```
/// use jsonload::{DecodeOptions, Value};
///
/// let v = jsonload::loads(r#"{"key":[1,2.5,"x"]}"#, DecodeOptions::default()).unwrap();
/// assert_eq!(v.get("key").and_then(Value::as_array).map(Vec::len), Some(3));
/// assert_eq!(v.to_string(), r#"{"key":[1,2.5,"x"]}"#);
/// ```
#[derive(Debug, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// An integer that fits in `i64`.
    Integer(i64),
    /// A real decoded to the nearest `f64`.
    Real(f64),
    /// An integer held by a big-integer backend.
    BigInteger(BigInteger),
    /// A real held by a big-real backend.
    BigReal(BigReal),
    /// Decoded string bytes. Valid UTF-8, but may hold NUL when `allow_nul`
    /// is set.
    String(BString),
    /// Elements in source order.
    Array(Array),
    /// Members in source order, keys unique.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v.into())
    }
}

impl From<BigInteger> for Value {
    fn from(v: BigInteger) -> Self {
        Self::BigInteger(v)
    }
}

impl From<BigReal> for Value {
    fn from(v: BigReal) -> Self {
        Self::BigReal(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` for any of the four number variants.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonload::Value;
    ///
    /// assert!(Value::Integer(1).is_number());
    /// assert!(Value::Real(0.5).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Integer(..) | Self::Real(..) | Self::BigInteger(..) | Self::BigReal(..)
        )
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The native integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as `f64`. Integers convert, possibly losing precision; big
    /// numbers do not.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The big integer, if this is one.
    #[must_use]
    pub fn as_big_integer(&self) -> Option<&BigInteger> {
        match self {
            Self::BigInteger(n) => Some(n),
            _ => None,
        }
    }

    /// The big real, if this is one.
    #[must_use]
    pub fn as_big_real(&self) -> Option<&BigReal> {
        match self {
            Self::BigReal(n) => Some(n),
            _ => None,
        }
    }

    /// The raw string bytes.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// The string, if it is valid UTF-8 (decoded strings always are).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => s.to_str().ok(),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Member `key` of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Deep copy. Big numbers are copied by their backends, so this fails if
    /// any backend `copy` fails.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        Some(match self {
            Self::Null => Self::Null,
            Self::Boolean(b) => Self::Boolean(*b),
            Self::Integer(n) => Self::Integer(*n),
            Self::Real(n) => Self::Real(*n),
            Self::BigInteger(n) => Self::BigInteger(n.try_clone()?),
            Self::BigReal(n) => Self::BigReal(n.try_clone()?),
            Self::String(s) => Self::String(s.clone()),
            Self::Array(a) => Self::Array(a.iter().map(Self::try_clone).collect::<Option<_>>()?),
            Self::Object(m) => Self::Object(
                m.iter()
                    .map(|(k, v)| Some((k.clone(), v.try_clone()?)))
                    .collect::<Option<_>>()?,
            ),
        })
    }
}

/// Writes `src` as the body of a JSON string literal.
///
/// Quotes, backslashes, control characters and the Unicode line separators
/// are escaped.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            // `Debug` keeps a `.0` or an exponent, so the text reads back as a real.
            Value::Real(n) if n.is_finite() => write!(f, "{n:?}"),
            Value::Real(_) => f.write_str("null"),
            Value::BigInteger(n) => write!(f, "{n}"),
            Value::BigReal(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(&s.to_str_lossy(), f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Real(n) => serializer.serialize_f64(*n),
            Value::BigInteger(n) => serializer.serialize_str(&n.to_decimal_string()),
            Value::BigReal(n) => serializer.serialize_str(&n.to_decimal_string()),
            Value::String(s) => serializer.serialize_str(&s.to_str_lossy()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
