//! Passages: ordered sets of verses within one versification.
//!
//! A passage stores verse ordinals in a roaring bitmap, which keeps canon
//! order for free and makes union and membership cheap no matter how a
//! mapping scatters its targets.

use std::fmt;
use std::sync::Arc;

use roaring::RoaringBitmap;

use crate::osis;
use crate::versification::{Ordinal, Verse, VerseRange, Versification};

#[derive(Clone, Debug)]
pub struct Passage {
    v11n: Arc<Versification>,
    ordinals: RoaringBitmap,
}

impl Passage {
    pub fn new(v11n: Arc<Versification>) -> Self {
        Self { v11n, ordinals: RoaringBitmap::new() }
    }
    pub fn v11n(&self) -> &Arc<Versification> {
        &self.v11n
    }
    /// Adds one verse. Verses reach a passage already validated against its
    /// system; anything the system cannot place is ignored.
    pub fn add(&mut self, verse: Verse) {
        if let Ok(ordinal) = self.v11n.ordinal(verse) {
            self.ordinals.insert(ordinal);
        }
    }
    pub fn add_range(&mut self, range: VerseRange) {
        if let Ok(start) = self.v11n.ordinal(range.start()) {
            self.ordinals.insert_range(start..start + range.cardinality());
        }
    }
    pub fn add_all(&mut self, other: &Passage) {
        debug_assert_eq!(self.v11n.name(), other.v11n.name());
        self.ordinals |= &other.ordinals;
    }
    pub fn contains(&self, verse: Verse) -> bool {
        match self.v11n.ordinal(verse) {
            Ok(ordinal) => self.ordinals.contains(ordinal),
            Err(_) => false,
        }
    }
    pub fn len(&self) -> u64 {
        self.ordinals.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        self.ordinals.iter().filter_map(move |ordinal| self.v11n.verse_at(ordinal))
    }

    /// The passage as maximal contiguous ranges, in canon order.
    pub fn ranges(&self) -> Vec<VerseRange> {
        let mut out = Vec::new();
        let mut run: Option<(Ordinal, Ordinal)> = None;
        for ordinal in self.ordinals.iter() {
            run = match run {
                Some((start, prev)) if ordinal == prev + 1 => Some((start, ordinal)),
                Some((start, prev)) => {
                    if let Some(range) = self.make_range(start, prev) {
                        out.push(range);
                    }
                    Some((ordinal, ordinal))
                }
                None => Some((ordinal, ordinal)),
            };
        }
        if let Some((start, prev)) = run {
            if let Some(range) = self.make_range(start, prev) {
                out.push(range);
            }
        }
        out
    }

    /// OSIS rendering: ranges joined by single spaces, the empty passage as
    /// the empty string.
    pub fn osis_ref(&self) -> String {
        self.ranges()
            .into_iter()
            .map(|range| osis::format_range(&self.v11n, range))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn make_range(&self, start: Ordinal, end: Ordinal) -> Option<VerseRange> {
        let verse = self.v11n.verse_at(start)?;
        Some(VerseRange::new(verse, end - start + 1))
    }
}

impl PartialEq for Passage {
    fn eq(&self, other: &Self) -> bool {
        self.v11n.name() == other.v11n.name() && self.ordinals == other.ordinals
    }
}
impl Eq for Passage {}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.osis_ref())
    }
}
