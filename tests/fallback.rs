use std::sync::Arc;

use versemap::error::VersemapError;
use versemap::loader::MappingSource;
use versemap::mapping::MappingTable;
use versemap::system;
use versemap::versification::Versification;

#[test]
fn unmapped_references_translate_by_identity() {
    let kjv = Arc::new(system::kjv());
    let source = MappingSource::from_text("Gen.1.1=Gen.1.2");
    let table = MappingTable::new(Arc::clone(&kjv), kjv, source.entries());
    // nothing was said about Gen.4.1, so it reads the same under the pivot
    assert_eq!(table.map_str("Gen.4.1").unwrap(), "Gen.4.1");
    assert_eq!(table.unmap_str("Gen.4.1").unwrap(), "Gen.4.1");
}

#[test]
fn translation_into_a_smaller_system_comes_back_empty() {
    let left = Arc::new(system::kjv());
    let pivot = Arc::new(
        Versification::builder("Psalter")
            .zero_verses(false)
            .book("Ps", &[6, 12, 8])
            .build(),
    );
    let table = MappingTable::new(left, pivot, &[]);
    // the pivot has no Genesis at all
    assert_eq!(table.map_str("Gen.1.1").unwrap(), "");
    // and no fourth Psalm
    assert_eq!(table.map_str("Ps.4.1").unwrap(), "");
    // but the Psalms it has translate straight across
    assert_eq!(table.map_str("Ps.2.3").unwrap(), "Ps.2.3");
}

#[test]
fn multi_verse_lookups_are_refused() {
    let kjv = Arc::new(system::kjv());
    let table = MappingTable::new(Arc::clone(&kjv), kjv, &[]);
    assert!(matches!(
        table.map_str("Gen.1.1-Gen.1.2"),
        Err(VersemapError::UnsupportedMultiVerseLookup(_))
    ));
    assert!(matches!(
        table.unmap_str("Gen.1.1-Gen.1.2"),
        Err(VersemapError::UnsupportedMultiVerseLookup(_))
    ));
}

#[test]
fn empty_lookups_are_refused() {
    let kjv = Arc::new(system::kjv());
    let table = MappingTable::new(Arc::clone(&kjv), kjv, &[]);
    assert!(matches!(table.map_str(""), Err(VersemapError::EmptyReference)));
    assert!(matches!(table.unmap_str(""), Err(VersemapError::EmptyReference)));
}

#[test]
fn garbage_lookups_are_refused() {
    let kjv = Arc::new(system::kjv());
    let table = MappingTable::new(Arc::clone(&kjv), kjv, &[]);
    assert!(matches!(table.map_str("not a reference"), Err(VersemapError::UnknownReference(_))));
    assert!(matches!(table.map_str("Nowhere.1.1"), Err(VersemapError::UnknownReference(_))));
}
