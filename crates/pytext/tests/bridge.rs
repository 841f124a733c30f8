//! Integration tests for the string bridge against an embedded interpreter.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::ffi::CStr;

use pyo3::exceptions::{PyUnicodeDecodeError, PyUnicodeEncodeError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use pytext::{BridgeConfig, BridgeError, RuntimeText, StringBridge, TextKind};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn eval<'py>(py: Python<'py>, code: &CStr) -> Bound<'py, PyAny> {
    py.eval(code, None, None)
        .unwrap_or_else(|e| panic!("failed to evaluate {code:?}: {e}"))
}

#[test]
fn test_non_strings_are_not_text() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        for code in [c"42", c"None", c"[1, 2]", c"bytearray(b'abc')", c"3.5"] {
            let obj = eval(py, code);
            assert!(!bridge.is_text_like(&obj), "{code:?} classified as text");
            assert!(bridge.extract_utf8(&obj).is_none());
            assert!(bridge.classify(&obj).is_none());
        }
        assert!(!PyErr::occurred(py));
    });
}

#[test]
fn test_is_text_like_is_idempotent() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        for code in [c"'abc'", c"b'abc'", c"1"] {
            let obj = eval(py, code);
            assert_eq!(bridge.is_text_like(&obj), bridge.is_text_like(&obj));
        }
    });
}

#[test]
fn test_subclasses_are_text() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let s = eval(py, c"type('S', (str,), {})('abc')");
        let b = eval(py, c"type('B', (bytes,), {})(b'abc')");
        assert!(bridge.is_text_like(&s));
        assert!(bridge.is_text_like(&b));
        assert_eq!(bridge.classify(&s).map(|t| t.kind()), Some(TextKind::Unicode));
        assert_eq!(bridge.classify(&b).map(|t| t.kind()), Some(TextKind::Legacy));
    });
}

#[test]
fn test_unicode_round_trip() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        for input in ["", "plain ascii", "héllo", "日本語", "emoji 🦀", "G1 X10 ; comment"] {
            let s = bridge
                .make_unicode_string(input)
                .map_err(|f| f.take())
                .unwrap();
            assert_eq!(s.to_str().unwrap(), input);

            let obj = s.as_any();
            let view = bridge.extract_utf8(obj).expect("str is text");
            assert_eq!(view.as_bytes(), input.as_bytes());
            assert_eq!(view.to_str(), Ok(input));
        }
    });
}

#[test]
fn test_hello_with_accent() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let input = [0x68, 0xC3, 0xA9, 0x6C, 0x6C, 0x6F];
        let s = bridge.make_unicode_string(input).map_err(|f| f.take()).unwrap();
        assert_eq!(s.to_str().unwrap(), "héllo");

        let obj = s.into_any();
        let view = bridge.extract_utf8(&obj).expect("str is text");
        assert_eq!(view.as_bytes(), &input);
        assert_eq!(view.len(), 6);
        assert_eq!(view.as_bytes_with_nul(), &[0x68, 0xC3, 0xA9, 0x6C, 0x6C, 0x6F, 0x00]);
        assert_eq!(view.kind(), TextKind::Unicode);
    });
}

#[test]
fn test_invalid_utf8_returns_sentinel() {
    init_tracing();
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let failed = bridge
            .make_unicode_string([0xFF, 0xFE])
            .expect_err("invalid UTF-8 must not construct");
        assert!(failed.is_pending());
        assert!(PyErr::occurred(py));

        let err = failed.take();
        assert!(err.is_instance_of::<PyUnicodeDecodeError>(py));
        assert!(!PyErr::occurred(py));
    });
}

#[test]
fn test_invalid_subsequence_never_partially_constructs() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        // Valid prefix, truncated multi-byte sequence, valid suffix.
        let input = b"abc\xE2\x82def";
        let err = bridge
            .make_unicode_string(input)
            .expect_err("invalid UTF-8 must not construct")
            .into_error();
        assert!(matches!(err, BridgeError::Encoding(_)));
        assert!(!PyErr::occurred(py));
    });
}

#[test]
fn test_legacy_string_is_byte_transparent() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let input = [0xFF, 0xFE, 0x00, 0x41];
        let b = bridge.make_legacy_string(input).map_err(|f| f.take()).unwrap();
        assert_eq!(b.as_bytes(), &input);

        let obj = b.into_any();
        assert!(bridge.is_text_like(&obj));
        let view = bridge.extract_utf8(&obj).expect("bytes is text");
        assert_eq!(view.as_bytes(), &input);
        assert_eq!(view.as_bytes_with_nul(), &[0xFF, 0xFE, 0x00, 0x41, 0x00]);
        assert_eq!(view.kind(), TextKind::Legacy);
        assert!(view.to_str().is_err());
    });
}

#[test]
fn test_view_length_matches_object() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);

        let b = PyBytes::new(py, b"G28 X Y");
        let obj = b.as_any();
        let view = bridge.extract_utf8(obj).expect("bytes is text");
        assert_eq!(view.len(), b.as_bytes().len());
        assert_eq!(view.as_bytes_with_nul()[view.len()], 0);

        let s = eval(py, c"'ü' * 10");
        let encoded_len: usize = s.call_method0("encode").unwrap().len().unwrap();
        let view = bridge.extract_utf8(&s).expect("str is text");
        assert_eq!(view.len(), encoded_len);
        assert_eq!(view.as_bytes_with_nul()[view.len()], 0);
    });
}

#[test]
fn test_lone_surrogate_fails_soft() {
    init_tracing();
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let s = eval(py, c"chr(0xD800)");
        assert!(bridge.is_text_like(&s));
        assert!(bridge.extract_utf8(&s).is_none());

        match bridge.take_pending_error() {
            Some(BridgeError::Encoding(err)) => {
                assert!(err.is_instance_of::<PyUnicodeEncodeError>(py));
            }
            other => panic!("expected encoding failure, got {other:?}"),
        }
        assert!(bridge.take_pending_error().is_none());
    });
}

#[test]
fn test_require_text_reports_type_name() {
    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        let obj = eval(py, c"42");
        match bridge.require_text(&obj) {
            Err(BridgeError::NotTextLike { type_name }) => assert_eq!(type_name, "int"),
            other => panic!("expected NotTextLike, got {other:?}"),
        }

        let obj = eval(py, c"'ok'");
        let text = bridge.require_text(&obj).unwrap();
        assert_eq!(text.utf8().map(|v| v.to_vec()), Some(b"ok".to_vec()));
    });
}

#[test]
fn test_make_text_follows_config() {
    Python::attach(|py| {
        let unicode = StringBridge::new(py).make_text("M117").map_err(|f| f.take()).unwrap();
        assert_eq!(unicode.kind(), TextKind::Unicode);

        let config = BridgeConfig::default().with_default_kind(TextKind::Legacy);
        let bridge = StringBridge::with_config(py, config);
        let legacy = bridge.make_text("M117").map_err(|f| f.take()).unwrap();
        assert!(matches!(legacy, RuntimeText::Legacy(_)));
        assert_eq!(legacy.utf8().unwrap().as_bytes(), b"M117");

        // Legacy construction accepts bytes that Unicode construction rejects.
        assert!(bridge.make_text([0xFF]).is_ok());
    });
}

#[test]
fn test_sentinel_converts_with_question_mark() {
    fn build<'py>(bridge: &StringBridge<'py>, bytes: &[u8]) -> PyResult<Bound<'py, PyAny>> {
        Ok(bridge.make_unicode_string(bytes)?.into_any())
    }

    Python::attach(|py| {
        let bridge = StringBridge::new(py);
        assert!(build(&bridge, b"ok").is_ok());
        let err = build(&bridge, b"\xC0").unwrap_err();
        assert!(err.is_instance_of::<PyUnicodeDecodeError>(py));
        assert!(!PyErr::occurred(py));
    });
}
