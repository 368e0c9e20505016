//! Integration tests for loading policies from files

use camino::Utf8PathBuf;
use celgcp::{Activation, Policy, Request, Resource};
use chrono::{TimeZone, Utc};
use std::fs;

fn write_policy(dir: &tempfile::TempDir, text: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join("policy.toml")).expect("temp path should be UTF-8");
    fs::write(&path, text).expect("Could not write policy file");
    path
}

#[test]
fn test_load_and_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_policy(
        &dir,
        r#"
name = "guarded_tag"
description = "Requires the production tag when the key is present"
expression = "!resource.hasTagKeyId('tagKeys/42') || resource.matchTagId('tagKeys/42', 'tagValues/7')"
"#,
    );

    let policy = Policy::load(&path).unwrap();
    assert_eq!(policy.name(), "guarded_tag");

    let request = Request::new(Utc.with_ymd_and_hms(2021, 3, 21, 1, 14, 51).unwrap());

    let untagged = Resource::new("projects/p");
    assert!(policy.evaluate(&Activation::new(request.clone(), &untagged)).unwrap());

    let matching = Resource::new("projects/p").with_tag("tagKeys/42", "tagValues/7");
    assert!(policy.evaluate(&Activation::new(request.clone(), &matching)).unwrap());

    let mismatching = Resource::new("projects/p").with_tag("tagKeys/42", "tagValues/8");
    assert!(!policy.evaluate(&Activation::new(request, &mismatching)).unwrap());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("missing.toml")).unwrap();

    let err = Policy::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("reading policy file"));
}

#[test]
fn test_load_invalid_expression() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_policy(
        &dir,
        r#"
name = "broken"
expression = "resource.matchTag('prj/dataset'"
"#,
    );

    let _ = Policy::load(&path).unwrap_err();
}
