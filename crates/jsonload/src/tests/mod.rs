mod numbers;

use crate::{
    DecodeContext, DecodeError, DecodeOptions, Decoder, Value,
    backends::decimal::{DecimalInteger, DecimalReal},
};

/// Context with both digit-string backends.
pub(crate) fn decimal_context() -> DecodeContext {
    DecodeContext::new()
        .with_big_integers(DecimalInteger)
        .with_big_reals(DecimalReal)
}

pub(crate) fn decode_with(input: &str, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::with_context(options, decimal_context())
        .decode_str(input)
        .map(|doc| doc.value)
}

pub(crate) fn decode(input: &str) -> Result<Value, DecodeError> {
    decode_with(input, DecodeOptions::default())
}

pub(crate) fn decode_any(input: &str) -> Result<Value, DecodeError> {
    decode_with(
        input,
        DecodeOptions {
            decode_any: true,
            ..Default::default()
        },
    )
}
