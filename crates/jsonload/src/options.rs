/// Default cap on container nesting.
///
/// The parser recurses once per level; this many levels fit the 2 MiB stack
/// of a spawned thread in a debug build.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// When integer tokens are handed to the big-integer backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BigIntegerMode {
    /// Never; integers outside the native range are an error.
    #[default]
    Disabled,
    /// Only integers that overflow `i64`.
    OnOverflow,
    /// Every integer token.
    Always,
}

/// When real tokens are handed to the big-real backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BigRealMode {
    /// Never; reals that overflow `f64` are an error.
    #[default]
    Disabled,
    /// Reals with too many significant digits to survive `f64`, and reals
    /// whose magnitude overflows or underflows it.
    OnPrecisionLoss,
    /// Every real token.
    Always,
}

impl BigIntegerMode {
    pub(crate) fn enabled(self) -> bool {
        self != Self::Disabled
    }
}

impl BigRealMode {
    pub(crate) fn enabled(self) -> bool {
        self != Self::Disabled
    }
}

/// Configuration options for a decode.
///
/// # Examples
///
/// ```rust
/// use jsonload::{DecodeOptions, Value};
///
/// let options = DecodeOptions {
///     decode_any: true,
///     ..Default::default()
/// };
/// assert_eq!(jsonload::loads("42", options).unwrap(), Value::Integer(42));
/// ```
///
/// # Default
///
/// Every flag is off, both big-number modes are disabled and nesting is
/// capped at [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DecodeOptions {
    /// Fail on an object key that appears twice in the same object.
    ///
    /// When `false` the last value for a key wins.
    pub reject_duplicates: bool,

    /// Accept `\u0000` inside string values.
    ///
    /// NUL is never accepted inside object keys.
    pub allow_nul: bool,

    /// Accept any JSON value at the top level, not just an object or array.
    pub decode_any: bool,

    /// Stop after the top-level value without requiring the rest of the
    /// input to be whitespace.
    ///
    /// [`crate::Decoded::position`] then tells where the value ended.
    pub disable_eof_check: bool,

    /// Decode integer tokens as [`crate::Value::Real`].
    ///
    /// The token text is converted straight to `f64`; it never passes
    /// through `i64`, so integers beyond the native range still decode.
    pub decode_int_as_real: bool,

    /// Big-integer fallback. Needs an integer backend in the context.
    pub big_integers: BigIntegerMode,

    /// Big-real fallback. Needs a real backend in the context.
    pub big_reals: BigRealMode,

    /// Deepest allowed nesting of arrays and objects; 0 means unlimited.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            reject_duplicates: false,
            allow_nul: false,
            decode_any: false,
            disable_eof_check: false,
            decode_int_as_real: false,
            big_integers: BigIntegerMode::Disabled,
            big_reals: BigRealMode::Disabled,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
