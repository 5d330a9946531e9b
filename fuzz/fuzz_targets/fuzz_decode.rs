#![no_main]

use arbitrary::Arbitrary;
use jsonload::{
    BigIntegerMode, BigRealMode, DecodeContext, DecodeOptions, Decoder,
    backends::bigint::{NumBigDecimal, NumBigInt},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum IntMode {
    Disabled,
    OnOverflow,
    Always,
}

#[derive(Debug, Arbitrary)]
enum RealMode {
    Disabled,
    OnPrecisionLoss,
    Always,
}

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    reject_duplicates: bool,
    decode_any: bool,
    disable_eof_check: bool,
    decode_int_as_real: bool,
    allow_nul: bool,
    big_integers: IntMode,
    big_reals: RealMode,
    // split points for the callback source
    chunk: u8,
    data: &'a [u8],
}

impl Input<'_> {
    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            reject_duplicates: self.reject_duplicates,
            decode_any: self.decode_any,
            disable_eof_check: self.disable_eof_check,
            decode_int_as_real: self.decode_int_as_real,
            allow_nul: self.allow_nul,
            big_integers: match self.big_integers {
                IntMode::Disabled => BigIntegerMode::Disabled,
                IntMode::OnOverflow => BigIntegerMode::OnOverflow,
                IntMode::Always => BigIntegerMode::Always,
            },
            big_reals: match self.big_reals {
                RealMode::Disabled => BigRealMode::Disabled,
                RealMode::OnPrecisionLoss => BigRealMode::OnPrecisionLoss,
                RealMode::Always => BigRealMode::Always,
            },
            ..Default::default()
        }
    }
}

fuzz_target!(|input: Input<'_>| {
    let context = DecodeContext::new()
        .with_big_integers(NumBigInt)
        .with_big_reals(NumBigDecimal);
    let decoder = Decoder::with_context(input.options(), context.clone());

    let whole = decoder.decode_bytes(input.data);

    // chunking must not change the outcome
    let chunk = usize::from(input.chunk.max(1));
    let mut rest = input.data;
    let chunked = decoder.decode_callback(|buf| {
        let n = rest.len().min(chunk).min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        rest = &rest[n..];
        Some(n)
    });
    match (&whole, &chunked) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => {
            assert_eq!(a.text(), b.text());
            assert_eq!(a.location, b.location);
        }
        _ => panic!("chunked decode disagrees: {whole:?} vs {chunked:?}"),
    }

    // whatever decodes renders back to text that decodes to the same value
    if let Ok(doc) = whole {
        assert!(doc.position <= input.data.len());
        let text = doc.value.to_string();
        let again = Decoder::with_context(
            DecodeOptions {
                decode_any: true,
                allow_nul: true,
                max_depth: 0,
                ..input.options()
            },
            context,
        )
        .decode_str(&text)
        .unwrap_or_else(|err| panic!("{text:?} does not decode: {err}"));
        if !input.decode_int_as_real {
            assert_eq!(again.value.to_string(), text);
        }
    }
});
