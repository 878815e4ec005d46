mod common;

use common::{zip_of, ORDER_X, ORDER_Y};
use json_zip_flattener::{
    process, BadEntryPolicy, EntryStatus, ErrorKind, FlattenMode, Flattener, Pipeline,
    PipelineError, Scalar,
};
use json_zip_flattener::archive::EntryFilter;

#[test]
fn expand_items_across_entries() {
    let bytes = zip_of(&[("a.json", ORDER_X), ("notes.txt", "ignored"), ("b.json", ORDER_Y)]);
    let table = process(&bytes, FlattenMode::ExpandItems).unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.header(),
        [
            "name",
            "customer_id",
            "customer_email",
            "product_name",
            "product_price",
            "product_quantity",
            "item_code",
            "item_name",
            "item_price",
            "item_quantity",
            "channel",
        ]
    );
    assert_eq!(table.cell(0, "name"), Some(&Scalar::from("X")));
    assert_eq!(table.cell(1, "item_code"), Some(&Scalar::from("I2")));
    assert_eq!(table.cell(0, "customer_email"), Some(&Scalar::Blank));
    assert_eq!(table.cell(0, "channel"), Some(&Scalar::Blank));
    assert_eq!(table.cell(2, "channel"), Some(&Scalar::from("store")));
    assert_eq!(table.cell(2, "customer_id"), Some(&Scalar::Blank));
}

#[test]
fn single_row_unifies_columns() {
    let bytes = zip_of(&[
        ("1.json", r#"{"a": 1, "b": 2}"#),
        ("2.json", r#"{"b": 3, "c": 4}"#),
        ("3.json", r#"{"tags": ["x", "y"], "meta": {"id": 7}}"#),
    ]);
    let table = process(&bytes, FlattenMode::SingleRow).unwrap();

    assert_eq!(table.header(), ["a", "b", "c", "tags", "meta_id"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.rows()[1],
        [
            Scalar::Blank,
            Scalar::from(3),
            Scalar::from(4),
            Scalar::Blank,
            Scalar::Blank
        ]
    );
    assert_eq!(table.cell(2, "tags"), Some(&Scalar::from(r#"["x","y"]"#)));
    assert_eq!(table.cell(2, "meta_id"), Some(&Scalar::from(7)));
}

#[test]
fn same_input_same_header() {
    let bytes = zip_of(&[
        ("1.json", r#"{"z": {"y": 1}, "a": 2}"#),
        ("2.json", r#"{"b": 1, "z": {"x": 3}}"#),
    ]);
    let first = process(&bytes, FlattenMode::SingleRow).unwrap();
    let second = process(&bytes, FlattenMode::SingleRow).unwrap();
    assert_eq!(first.header(), ["z_y", "a", "b", "z_x"]);
    assert_eq!(first, second);
}

#[test]
fn not_a_zip() {
    let err = process(b"{\"a\": 1}", FlattenMode::SingleRow).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputFormat);
}

#[test]
fn no_json_entries_is_no_data() {
    let bytes = zip_of(&[("readme.md", "# hi"), ("data.csv", "a,b")]);
    let err = process(&bytes, FlattenMode::SingleRow).unwrap_err();
    assert!(matches!(err, PipelineError::NoMatchingEntries { .. }));
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[test]
fn empty_archive_is_no_data() {
    let err = process(&zip_of(&[]), FlattenMode::ExpandItems).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[test]
fn documents_without_products_is_no_data() {
    let bytes = zip_of(&[
        ("a.json", r#"{"name": "X", "products": []}"#),
        ("b.json", r#"{"name": "Y"}"#),
    ]);
    let err = process(&bytes, FlattenMode::ExpandItems).unwrap_err();
    assert!(matches!(err, PipelineError::NoRecords));
}

#[test]
fn entry_without_rows_does_not_fail_the_batch() {
    let bytes = zip_of(&[("a.json", r#"{"name": "empty", "products": []}"#), ("b.json", ORDER_Y)]);
    let table = process(&bytes, FlattenMode::ExpandItems).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.cell(0, "name"), Some(&Scalar::from("Y")));
}

#[test]
fn bad_entry_aborts_by_default() {
    let bytes = zip_of(&[("a.json", ORDER_X), ("broken.json", "{\"name\": ")]);
    match process(&bytes, FlattenMode::ExpandItems).unwrap_err() {
        PipelineError::DocumentParse { entry, .. } => assert_eq!(entry, "broken.json"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_entry_can_be_skipped() {
    let pipeline = Pipeline::new(
        Flattener::new(FlattenMode::ExpandItems, "_"),
        EntryFilter::default(),
        BadEntryPolicy::Skip,
    );
    let bytes = zip_of(&[("a.json", ORDER_X), ("broken.json", "not json"), ("b.json", ORDER_Y)]);
    let report = pipeline.process(&bytes).unwrap();

    assert_eq!(report.table.row_count(), 3);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.entries[0].status, EntryStatus::Flattened { records: 2 });
    assert!(matches!(report.entries[1].status, EntryStatus::Skipped { .. }));
    assert_eq!(report.skipped().count(), 1);
}

#[test]
fn skipping_every_entry_is_still_no_data() {
    let pipeline = Pipeline::new(
        Flattener::new(FlattenMode::SingleRow, "_"),
        EntryFilter::default(),
        BadEntryPolicy::Skip,
    );
    let err = pipeline.process(&zip_of(&[("a.json", "[")])).unwrap_err();
    assert!(matches!(err, PipelineError::NoRecords));
}

#[test]
fn custom_suffix_filter() {
    let pipeline = Pipeline::new(
        Flattener::new(FlattenMode::SingleRow, "."),
        EntryFilter::new(vec![".ndoc".into()]),
        BadEntryPolicy::Abort,
    );
    let bytes = zip_of(&[("a.json", "broken"), ("b.ndoc", r#"{"m": {"k": true}}"#)]);
    let report = pipeline.process(&bytes).unwrap();
    assert_eq!(report.table.header(), ["m.k"]);
    assert_eq!(report.table.cell(0, "m.k"), Some(&Scalar::Bool(true)));
}
