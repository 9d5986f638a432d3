use std::sync::Arc;

use versemap::osis;
use versemap::passage::Passage;
use versemap::system;
use versemap::versification::{Verse, Versification};

#[test]
fn ordinals_round_trip() {
    let kjv = system::kjv();
    for reference in ["Gen.1.0", "Gen.1.31", "Ps.119.176", "Mal.4.6", "Rev.22.21"] {
        let verse = osis::parse_verse(&kjv, reference).unwrap();
        let ordinal = kjv.ordinal(verse).unwrap();
        assert_eq!(kjv.verse_at(ordinal), Some(verse), "{} should round trip", reference);
    }
}

#[test]
fn arithmetic_crosses_chapters_and_books() {
    let kjv = system::kjv();
    let last_of_genesis = osis::parse_verse(&kjv, "Gen.50.26").unwrap();
    let next = kjv.add(last_of_genesis, 1).unwrap();
    assert_eq!(osis::format_verse(&kjv, next), "Exod.1.0");
    let back = kjv.subtract(next, 1).unwrap();
    assert_eq!(back, last_of_genesis);
}

#[test]
fn arithmetic_stops_at_either_end() {
    let kjv = system::kjv();
    let first = osis::parse_verse(&kjv, "Gen.1.0").unwrap();
    assert!(kjv.subtract(first, 1).is_err());
    let last = osis::parse_verse(&kjv, "Rev.22.21").unwrap();
    assert!(kjv.add(last, 1).is_err());
}

#[test]
fn systems_may_refuse_verse_zero() {
    let plain = Versification::builder("Plain")
        .zero_verses(false)
        .book("Ps", &[6, 12])
        .build();
    assert!(!plain.contains(Verse::new(0, 1, 0)));
    assert!(plain.contains(Verse::new(0, 1, 1)));
    assert!(osis::parse_verse(&plain, "Ps.1.0").is_err());
    // without verse 0, chapters sit directly next to each other
    let last = osis::parse_verse(&plain, "Ps.1.6").unwrap();
    let next = plain.add(last, 1).unwrap();
    assert_eq!(osis::format_verse(&plain, next), "Ps.2.1");
}

#[test]
fn ranges_iterate_in_canon_order() {
    let kjv = system::kjv();
    let range = osis::parse_range(&kjv, "Ps.18.49-Ps.19.1").unwrap();
    let verses: Vec<String> = kjv.verses(range).map(|v| osis::format_verse(&kjv, v)).collect();
    assert_eq!(verses, ["Ps.18.49", "Ps.18.50", "Ps.19.0", "Ps.19.1"]);
}

#[test]
fn backwards_ranges_are_refused() {
    let kjv = system::kjv();
    assert!(osis::parse_range(&kjv, "Gen.1.2-Gen.1.1").is_err());
}

#[test]
fn passages_render_as_coalesced_ranges() {
    let kjv = Arc::new(system::kjv());
    let mut passage = Passage::new(Arc::clone(&kjv));
    passage.add_range(osis::parse_range(&kjv, "Gen.1.1-Gen.1.3").unwrap());
    passage.add(osis::parse_verse(&kjv, "Gen.1.5").unwrap());
    assert_eq!(passage.osis_ref(), "Gen.1.1-Gen.1.3 Gen.1.5");
    assert_eq!(passage.len(), 4);

    let reparsed = osis::parse_passage(&kjv, &passage.osis_ref()).unwrap();
    assert_eq!(reparsed, passage);
}

#[test]
fn the_empty_passage_renders_empty() {
    let kjv = Arc::new(system::kjv());
    let passage = Passage::new(kjv);
    assert!(passage.is_empty());
    assert_eq!(passage.osis_ref(), "");
}

#[test]
fn unions_merge_adjacent_runs() {
    let kjv = Arc::new(system::kjv());
    let mut first = Passage::new(Arc::clone(&kjv));
    first.add_range(osis::parse_range(&kjv, "Gen.1.1-Gen.1.2").unwrap());
    let mut second = Passage::new(Arc::clone(&kjv));
    second.add_range(osis::parse_range(&kjv, "Gen.1.3-Gen.1.4").unwrap());
    first.add_all(&second);
    assert_eq!(first.osis_ref(), "Gen.1.1-Gen.1.4");
}
