use std::sync::Arc;

use versemap::error::VersemapError;
use versemap::loader::MappingSource;
use versemap::mapping::MappingTable;
use versemap::system;

fn build(text: &str) -> MappingTable {
    let source = MappingSource::from_text(text);
    MappingTable::new(Arc::new(system::kjv()), Arc::new(system::kjv()), source.entries())
}

#[test]
fn negative_offset_crosses_the_chapter_boundary() {
    let table = build("Ps.19.0-Ps.19.2=-1");
    assert!(!table.has_errors());
    // the title of Psalm 19 lands on the last verse of Psalm 18
    assert_eq!(table.map_str("Ps.19.0").unwrap(), "Ps.18.50");
    assert_eq!(table.map_str("Ps.19.1").unwrap(), "Ps.19.0");
    assert_eq!(table.map_str("Ps.19.2").unwrap(), "Ps.19.1");
    assert_eq!(table.unmap_str("Ps.18.50").unwrap(), "Ps.19.0");
    assert_eq!(table.unmap_str("Ps.19.0").unwrap(), "Ps.19.1");
}

#[test]
fn zero_offset_is_the_identity() {
    let table = build("Gen.2.1-Gen.2.3=+0");
    assert!(!table.has_errors());
    assert_eq!(table.map_str("Gen.2.1").unwrap(), "Gen.2.1");
    assert_eq!(table.map_str("Gen.2.2").unwrap(), "Gen.2.2");
    assert_eq!(table.map_str("Gen.2.3").unwrap(), "Gen.2.3");
}

#[test]
fn positive_offset_on_a_single_verse() {
    let table = build("Gen.1.31=+1");
    assert!(!table.has_errors());
    // one step past the last verse of the chapter is the next chapter's
    // verse 0
    assert_eq!(table.map_str("Gen.1.31").unwrap(), "Gen.2.0");
    assert_eq!(table.unmap_str("Gen.2.0").unwrap(), "Gen.1.31");
}

#[test]
fn offset_without_a_basis_is_rejected() {
    let table = build("?=+2");
    assert!(table.has_errors());
    assert!(matches!(table.diagnostics()[0].error, VersemapError::OffsetWithoutBasis));
}

#[test]
fn offset_past_the_end_of_the_pivot_is_rejected() {
    let table = build("Rev.22.21=+1");
    assert!(table.has_errors());
    assert!(matches!(table.diagnostics()[0].error, VersemapError::UnknownReference(_)));
}
