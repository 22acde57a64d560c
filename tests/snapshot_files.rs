/* tests/snapshot_files.rs */
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{fs, io::Write};

use holoindex::{HoloIndexError, IndexConfig, TermIndexRegistry};
use tempfile::{tempdir, NamedTempFile};

#[test]
fn dense_registry_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vectors.bin");
    let config = IndexConfig::holographic(16).with_seed(12);

    let source = TermIndexRegistry::new(&config).unwrap();
    for term in ["alpha", "beta", "gamma", "ünïcode"] {
        source.get_or_create(term);
    }
    source.save_to_path(&path).unwrap();

    let expected_len = 4 + ["alpha", "beta", "gamma", "ünïcode"]
        .iter()
        .map(|t| 4 + t.len() + 16 * 8)
        .sum::<usize>();
    assert_eq!(fs::metadata(&path).unwrap().len() as usize, expected_len);

    let restored = TermIndexRegistry::new(&config).unwrap();
    restored.load_from_path(&path).unwrap();
    let mut terms = restored.terms();
    terms.sort();
    assert_eq!(terms, ["alpha", "beta", "gamma", "ünïcode"]);
    for term in &terms {
        assert_eq!(*restored.get(term).unwrap(), *source.get(term).unwrap());
    }
}

#[test]
fn empty_snapshot_clears_registry() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&0i32.to_be_bytes()).unwrap();
    file.flush().unwrap();

    let registry = TermIndexRegistry::new(&IndexConfig::random_indexing(32).with_seed(1)).unwrap();
    registry.get_or_create("old");
    registry.load_from_path(file.path()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let registry = TermIndexRegistry::new(&IndexConfig::random_indexing(32)).unwrap();
    let err = registry.load_from_path(dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, HoloIndexError::Io(_)));
}

#[test]
fn yaml_config_drives_a_registry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.yaml");
    fs::write(
        &path,
        "dimensions: 64\ngenerator:\n  kind: ternary\n  bits_to_set: 6\n  variance: 2\nseed: 99\n",
    )
    .unwrap();
    let config = IndexConfig::from_path(&path).unwrap();
    let registry = TermIndexRegistry::new(&config).unwrap();
    let count = registry.get_or_create("x").as_ternary().unwrap().nonzero_count();
    assert!((4..=8).contains(&count));
}
