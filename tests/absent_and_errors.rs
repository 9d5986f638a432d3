use std::sync::Arc;

use versemap::error::VersemapError;
use versemap::loader::MappingSource;
use versemap::mapping::MappingTable;
use versemap::osis;
use versemap::system;

fn build(text: &str) -> MappingTable {
    let source = MappingSource::from_text(text);
    MappingTable::new(Arc::new(system::kjv()), Arc::new(system::kjv()), source.entries())
}

#[test]
fn verses_absent_on_the_left_unmap_to_nothing() {
    let table = build("?=Gen.1.1;Gen.1.5");
    assert!(!table.has_errors());
    assert_eq!(table.unmap_str("Gen.1.1").unwrap(), "");
    assert_eq!(table.unmap_str("Gen.1.5").unwrap(), "");
    let first = osis::parse_verse(table.pivot(), "Gen.1.1").unwrap();
    let fifth = osis::parse_verse(table.pivot(), "Gen.1.5").unwrap();
    assert!(table.absent().contains(first));
    assert!(table.absent().contains(fifth));
    // verses not declared absent still translate
    assert_eq!(table.unmap_str("Gen.1.2").unwrap(), "Gen.1.2");
}

#[test]
fn sections_absent_in_the_pivot_render_by_name() {
    let table = build("Gen.1.1=?NewPassage");
    assert!(!table.has_errors());
    assert_eq!(table.map_to_qualified_str("Gen.1.1").unwrap(), "NewPassage");
    // a section contributes nothing to a passage result
    assert_eq!(table.map_str("Gen.1.1").unwrap(), "");
}

#[test]
fn cardinality_mismatch_discards_the_entry() {
    let table = build("Gen.1.1-Gen.1.2=Gen.2.1-Gen.2.5");
    assert!(table.has_errors());
    assert_eq!(table.diagnostics().len(), 1);
    assert!(matches!(
        table.diagnostics()[0].error,
        VersemapError::CardinalityMismatch { left_count: 2, pivot_count: 5, .. }
    ));
    // the indexes are untouched, so both verses fall back to identity
    assert_eq!(table.map_str("Gen.1.1").unwrap(), "Gen.1.1");
    assert_eq!(table.map_str("Gen.1.2").unwrap(), "Gen.1.2");
}

#[test]
fn a_bad_entry_does_not_stop_its_neighbours() {
    let table = build("Foo.1.1=Gen.1.1\nGen.2.1=Gen.2.2");
    assert!(table.has_errors());
    assert_eq!(table.diagnostics().len(), 1);
    assert!(matches!(table.diagnostics()[0].error, VersemapError::UnknownReference(_)));
    assert_eq!(table.map_str("Gen.2.1").unwrap(), "Gen.2.2");
}

#[test]
fn named_sections_are_not_understood_on_the_left() {
    let table = build("?Section=Gen.1.1");
    assert!(table.has_errors());
    assert!(matches!(table.diagnostics()[0].error, VersemapError::UnknownReference(_)));
}

#[test]
fn unknown_flags_are_reported() {
    let table = build("!someOtherFlag");
    assert!(table.has_errors());
}

#[test]
fn unknown_references_are_reported() {
    for entry in ["Gen.99.1=Gen.1.1", "Gen.1.99=Gen.1.1", "Gen.1.2-Gen.1.1=Gen.1.1"] {
        let table = build(entry);
        assert!(table.has_errors(), "{} should fail to compile", entry);
    }
}
