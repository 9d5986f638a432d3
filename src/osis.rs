//! OSIS reference parsing and serialization.
//!
//! References take the canonical `Book.Chapter.Verse` form, ranges the
//! `A-B` form, and passages list ranges separated by single spaces. Every
//! parse resolves against a concrete [`Versification`], so a reference that
//! names a book or verse the system does not have is rejected rather than
//! patched.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, VersemapError};
use crate::passage::Passage;
use crate::versification::{Verse, VerseRange, Versification};

lazy_static! {
    static ref RE_VERSE: Regex = Regex::new(r"^([0-9A-Za-z]+)\.([0-9]+)\.([0-9]+)$").unwrap();
}

/// Parses a single `Book.Chapter.Verse` reference.
pub fn parse_verse(v11n: &Versification, text: &str) -> Result<Verse> {
    if text.is_empty() {
        return Err(VersemapError::EmptyReference);
    }
    let unknown = || VersemapError::UnknownReference(format!("{} ({})", text, v11n.name()));
    let caps = RE_VERSE.captures(text).ok_or_else(|| unknown())?;
    let book = v11n.book_id(&caps[1]).ok_or_else(|| unknown())?;
    let chapter: u16 = caps[2].parse().map_err(|_| unknown())?;
    let verse: u16 = caps[3].parse().map_err(|_| unknown())?;
    let parsed = Verse::new(book, chapter, verse);
    if !v11n.contains(parsed) {
        return Err(unknown());
    }
    Ok(parsed)
}

/// Parses a reference or an `A-B` range, coercing a single verse to a range
/// of cardinality 1.
pub fn parse_range(v11n: &Versification, text: &str) -> Result<VerseRange> {
    if text.is_empty() {
        return Err(VersemapError::EmptyReference);
    }
    match text.split_once('-') {
        Some((start, end)) => {
            let start = parse_verse(v11n, start)?;
            let end = parse_verse(v11n, end)?;
            v11n.range(start, end)
        }
        None => Ok(VerseRange::single(parse_verse(v11n, text)?)),
    }
}

/// Parses a whitespace separated list of references and ranges into a
/// passage under the given system.
pub fn parse_passage(v11n: &Arc<Versification>, text: &str) -> Result<Passage> {
    if text.trim().is_empty() {
        return Err(VersemapError::EmptyReference);
    }
    let mut passage = Passage::new(Arc::clone(v11n));
    for token in text.split_whitespace() {
        passage.add_range(parse_range(v11n, token)?);
    }
    Ok(passage)
}

pub fn format_verse(v11n: &Versification, verse: Verse) -> String {
    let osis = v11n.book_osis(verse.book()).unwrap_or("?");
    format!("{}.{}.{}", osis, verse.chapter(), verse.verse())
}

pub fn format_range(v11n: &Versification, range: VerseRange) -> String {
    if range.cardinality() == 1 {
        return format_verse(v11n, range.start());
    }
    match v11n.add(range.start(), range.cardinality() - 1) {
        Ok(end) => format!("{}-{}", format_verse(v11n, range.start()), format_verse(v11n, end)),
        Err(_) => format_verse(v11n, range.start()),
    }
}
