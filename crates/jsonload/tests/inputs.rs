#![expect(missing_docs)]

use std::io::{self, Cursor, Read};

use jsonload::{DecodeContext, DecodeOptions, Decoder, ErrorKind, SliceSource, Value};

mod common;

use crate::common::{SAMPLE, temp_file};

fn decoder() -> Decoder {
    Decoder::with_context(DecodeOptions::default(), DecodeContext::new())
}

#[test]
fn every_input_kind_agrees() {
    let d = decoder();
    let expected = d.decode_str(SAMPLE).unwrap().value;

    assert_eq!(d.decode_bytes(SAMPLE.as_bytes()).unwrap().value, expected);
    assert_eq!(d.decode_reader(Cursor::new(SAMPLE)).unwrap().value, expected);

    let path = temp_file("sample.json", SAMPLE.as_bytes());
    assert_eq!(d.decode_file(&path).unwrap().value, expected);

    let mut rest = SAMPLE.as_bytes();
    let from_callback = d
        .decode_callback(|buf| {
            let n = rest.len().min(7).min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            Some(n)
        })
        .unwrap();
    assert_eq!(from_callback.value, expected);

    let from_source = d
        .decode_source(SliceSource::new(SAMPLE.as_bytes()), "custom")
        .unwrap();
    assert_eq!(from_source.value, expected);
}

#[test]
fn sample_contents() {
    let v = decoder().decode_str(SAMPLE).unwrap().value;
    assert_eq!(v.get("name").and_then(Value::as_str), Some("jsonload"));
    assert_eq!(v.get("offset").and_then(Value::as_i64), Some(-12));
    assert_eq!(v.get("ratio").and_then(Value::as_f64), Some(0.75));
    let tags = v.get("tags").and_then(Value::as_array).unwrap();
    assert_eq!(tags[2].as_str(), Some("café"));
    assert_eq!(tags[3].as_str(), Some("😀"));
    assert_eq!(
        v.get("escapes").and_then(Value::as_str),
        Some("tab\there \"quoted\" back\\slash")
    );
}

#[test]
fn origins_label_errors() {
    let d = decoder();
    assert_eq!(d.decode_str("[").unwrap_err().origin(), "<string>");
    assert_eq!(d.decode_bytes(b"[").unwrap_err().origin(), "<buffer>");
    assert_eq!(d.decode_reader(Cursor::new("[")).unwrap_err().origin(), "<stream>");
    assert_eq!(d.decode_callback(|_| None).unwrap_err().origin(), "<callback>");

    let path = temp_file("broken.json", b"{\"a\" 1}");
    let err = d.decode_file(&path).unwrap_err();
    assert_eq!(err.origin(), path.display().to_string());
    assert_eq!(err.to_string(), format!("{}:1:6: ':' expected near '1'", path.display()));
}

#[test]
fn missing_file() {
    let path = std::env::temp_dir().join("jsonload-definitely-missing.json");
    let err = decoder().decode_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(
        err.text().starts_with(&format!("unable to open {}: ", path.display())),
        "{err}"
    );
    assert_eq!(err.location, None);
    assert_eq!(err.line(), 0);
}

/// Yields some bytes, then fails.
struct Flaky {
    data: Cursor<&'static [u8]>,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::other("connection reset")),
            n => Ok(n),
        }
    }
}

#[test]
fn read_error_replaces_the_decode_error() {
    let err = decoder()
        .decode_reader(Flaky {
            data: Cursor::new(&b"[1, 2"[..]),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.text(), "read error: connection reset");
    assert_eq!(err.to_string(), "<stream>: read error: connection reset");
}

#[test]
fn callback_error_ends_the_input() {
    let mut calls = 0;
    let err = decoder()
        .decode_callback(|buf| {
            calls += 1;
            if calls == 1 {
                buf[..3].copy_from_slice(b"[1,");
                Some(3)
            } else {
                None
            }
        })
        .unwrap_err();
    assert_eq!(err.text(), "']' expected near end of file");
    assert_eq!(calls, 2);
}

#[test]
fn callback_chunks_may_split_code_points() {
    let text = "[\"é😀\"]".as_bytes();
    let mut i = 0;
    let v = decoder()
        .decode_callback(|buf| {
            if i == text.len() {
                return Some(0);
            }
            buf[0] = text[i];
            i += 1;
            Some(1)
        })
        .unwrap()
        .value;
    assert_eq!(v, Value::Array(vec![Value::from("é😀")]));
}

#[test]
fn free_functions_use_the_global_context() {
    let v = jsonload::loads("[true]", DecodeOptions::default()).unwrap();
    assert_eq!(v, Value::Array(vec![Value::Boolean(true)]));
    assert!(jsonload::loadb(b"{}", DecodeOptions::default()).is_ok());
    assert!(jsonload::load_reader(Cursor::new("[]"), DecodeOptions::default()).is_ok());

    let path = temp_file("free.json", b"[null]");
    assert_eq!(
        jsonload::load_file(&path, DecodeOptions::default()).unwrap(),
        Value::Array(vec![Value::Null])
    );

    let mut sent = false;
    let v = jsonload::load_callback(
        |buf| {
            if sent {
                return None;
            }
            sent = true;
            buf[..2].copy_from_slice(b"[]");
            Some(2)
        },
        DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(v, Value::Array(vec![]));
}
