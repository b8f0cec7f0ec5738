mod common;

use std::{
    ffi::OsStr,
    process::{Command, Output},
};

use common::*;
use rmmanifest::Image;

fn rmmanifest(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rmmanifest"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn without_arguments() {
    let output = rmmanifest(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), "Exe file required as an argument\n");
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file() {
    let dir = TestDir::new("cli-missing");
    let path = dir.path().join("missing.exe");
    let output = rmmanifest(&[path.as_os_str()]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let code = stderr.trim_end();
    assert!(!code.is_empty() && code.chars().all(|c| c.is_ascii_digit()), "raw error code: {:?}", stderr);
    assert_ne!(code, "0");
    assert!(dir.file_names().is_empty());
}

#[test]
fn invalid_file() {
    let dir = TestDir::new("cli-invalid");
    let contents = b"MZ but nothing else".to_vec();
    let path = dir.write("broken.exe", &contents);
    let output = rmmanifest(&[path.as_os_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
    assert_eq!(std::fs::read(&path).unwrap(), contents, "file unchanged");
}

#[test]
fn clears_manifest() {
    let dir = TestDir::new("cli-clear");
    let path = dir.write("app.exe", &build_image(Some(&sample_resources()), &[]));

    let output = rmmanifest(&[path.as_os_str()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty(), "no output on success");
    assert!(output.stderr.is_empty(), "no output on success");

    let image = Image::parse_file(&path).unwrap();
    let resources = image.resource_directory().unwrap();
    assert_eq!(resources.get(&manifest_key()).unwrap().data(), &[] as &[u8]);
    assert_eq!(resources.get(&payload_key()).unwrap().data(), PAYLOAD);

    let first = std::fs::read(&path).unwrap();
    let output = rmmanifest(&[path.as_os_str()]);
    assert_eq!(output.status.code(), Some(0), "second run succeeds");
    assert_eq!(std::fs::read(&path).unwrap(), first);
}

#[test]
fn extra_arguments_are_ignored() {
    let dir = TestDir::new("cli-extra");
    let path = dir.write("app.exe", &build_image(None, &[]));

    let output = rmmanifest(&[path.as_os_str(), OsStr::new("--verbose"), OsStr::new("other.exe")]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    assert!(Image::parse_file(&path).unwrap().resource_directory().is_some());
}

#[test]
fn leading_double_dash_is_skipped() {
    let dir = TestDir::new("cli-double-dash");
    let path = dir.write("app.exe", &build_image(Some(&sample_resources()), &[]));

    let output = rmmanifest(&[OsStr::new("--"), path.as_os_str()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    let image = Image::parse_file(&path).unwrap();
    assert_eq!(image.resource_directory().unwrap().get(&manifest_key()).unwrap().data(), &[] as &[u8]);
}
