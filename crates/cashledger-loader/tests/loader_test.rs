//! Integration tests for the loader crate.

use cashledger_core::{CommodityOrigin, ReconcileState, SlotValue};
use cashledger_loader::{load, Compression, LoadError, Loader};
use cashledger_parser::DecodeError;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

fn fixtures_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_load_simple_file() {
    let book = load(&fixtures_path("simple.gnucash")).expect("should load simple file");

    assert_eq!(book.guid(), "9e7e4ac3a4f2a1f0f3b9a4d3a1c2b3d4");
    assert_eq!(book.account_count(), 6);
    assert_eq!(book.transaction_count(), 2);
    assert_eq!(book.split_count(), 4);

    let bank = book.find_account("Current Account").unwrap();
    assert_eq!(book.full_name(bank), "Assets:Current Account");
    assert_eq!(book[bank].splits().len(), 2);

    let groceries = book.find_account("Groceries").unwrap();
    let split = &book[book[groceries].splits()[0]];
    assert_eq!(split.memo.as_deref(), Some("weekly shop"));
    assert_eq!(split.reconciled_state, ReconcileState::NotReconciled);
    assert_eq!(book[split.transaction()].num.as_deref(), Some("42"));
}

#[test]
fn test_load_simple_file_metadata() {
    let book = load(&fixtures_path("simple.gnucash")).unwrap();

    let assets = book.find_account("Assets").unwrap();
    assert_eq!(
        book[assets].slots.get("placeholder"),
        Some(&SlotValue::String("true".to_string()))
    );
    assert!(book.slots()["features"].as_frame().is_some());

    let (_, opening) = book.transactions().next().unwrap();
    assert!(matches!(opening.slots["date-posted"], SlotValue::Date(_)));
}

#[test]
fn test_load_simple_file_commodities() {
    let book = load(&fixtures_path("simple.gnucash")).unwrap();
    let table = book.commodities();

    let eur = &table[table.resolve("ISO4217", "EUR").unwrap()];
    assert!(eur.get_quotes);
    assert_eq!(eur.quote_source.as_deref(), Some("currency"));

    let usd = &table[table.resolve("ISO4217", "USD").unwrap()];
    assert_eq!(usd.origin, CommodityOrigin::Registered);
    assert_eq!(table.declared().count(), 2);
}

#[test]
fn test_load_gzip_file() {
    let plain = std::fs::read(fixtures_path("simple.gnucash")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simple.gnucash");
    std::fs::write(&path, gzip(&plain)).unwrap();

    let book = load(&path).expect("should load compressed file");
    assert_eq!(book.transaction_count(), 2);

    let forced = Loader::new()
        .with_compression(Compression::Gzip)
        .load(&path)
        .unwrap();
    assert_eq!(forced.account_count(), book.account_count());
}

#[test]
fn test_plain_mode_refuses_gzip() {
    let plain = std::fs::read(fixtures_path("simple.gnucash")).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&gzip(&plain)).unwrap();

    let result = Loader::new()
        .with_compression(Compression::Plain)
        .load(file.path());
    assert!(matches!(
        result,
        Err(LoadError::Encoding { .. } | LoadError::Decode { .. })
    ));
}

#[test]
fn test_load_reader_gzip() {
    let plain = std::fs::read(fixtures_path("simple.gnucash")).unwrap();
    let compressed = gzip(&plain);
    let book = Loader::new().load_reader(compressed.as_slice()).unwrap();
    assert_eq!(book.split_count(), 4);
}

#[test]
fn test_load_nonexistent_file() {
    let path = fixtures_path("does_not_exist.gnucash");
    match load(&path) {
        Err(LoadError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_truncated_gzip() {
    let plain = std::fs::read(fixtures_path("simple.gnucash")).unwrap();
    let compressed = gzip(&plain);
    let truncated = &compressed[..compressed.len() / 2];
    let err = Loader::new().load_reader(truncated).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Decompress { .. } | LoadError::Decode { .. }
    ));
}

#[test]
fn test_decode_failure_keeps_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<gnc-v2><gnc:book xmlns:gnc=\"http://www.gnucash.org/XML/gnc\"/></gnc-v2>")
        .unwrap();
    let err = load(file.path()).unwrap_err();
    assert_eq!(err.path(), file.path());
    assert!(matches!(
        err.decode_error(),
        Some(DecodeError::MissingElement { .. })
    ));
}
