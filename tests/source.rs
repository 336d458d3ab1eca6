use std::fs;
use std::path::PathBuf;
use std::process;

use pretty_assertions::assert_eq;

use rox::error::LoxError;
use rox::lox::read_source;

/// A path under the temp dir that no other test process uses.
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rox-{}-{}.lox", process::id(), name))
}

#[test]
fn reads_utf8_file() {
    let path = scratch("valid");
    fs::write(&path, "print \"héllo\";\n").unwrap();

    let source = read_source(&path);
    fs::remove_file(&path).unwrap();

    assert_eq!(source.unwrap(), "print \"héllo\";\n");
}

#[test]
fn missing_file_is_io_error() {
    let result = read_source(&scratch("does-not-exist"));
    assert!(matches!(result, Err(LoxError::Io(_))), "{:?}", result);
}

#[test]
fn invalid_utf8_is_rejected() {
    let path = scratch("latin1");
    fs::write(&path, [b'p', b'r', b'i', b'n', b't', b' ', 0xff, 0xfe]).unwrap();

    let result = read_source(&path);
    fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(LoxError::Utf8(_))), "{:?}", result);
}
