//! Mapping table engine.
//!
//! This module compiles a versification mapping, given as a sequence of
//! shorthand key/value entries, into two indexes: forward (left system to
//! pivot) and reverse (pivot to left). The shorthand is described in the
//! grammar file `mapping.pest`; an entry maps a reference or range on the
//! left to a reference, range, offset or absence marker on the pivot side:
//!
//! * `Gen.1.1=Gen.1.2` – a single shifted verse.
//! * `Gen.1.1-Gen.1.2=Gen.1.2-Gen.1.3` – ranges zipped verse by verse.
//!   When the two sides differ in length by exactly one, verse 0 is
//!   skipped on whichever side carries it.
//! * `Ps.19.0-Ps.19.2=-1` – the pivot side is the left side moved by a
//!   signed number of verses under the pivot's arithmetic.
//! * `Gen.1.1=Gen.1.1!a` – a part tag splits one pivot verse into labeled
//!   fragments so that round-trips through the pivot stay lossless.
//! * `Gen.1.1=?SectionName` – left material with no pivot counterpart.
//! * `?=Gen.1.1;Gen.1.5` – pivot verses that do not exist on the left.
//! * `!zerosUnmapped` – a global flag: unmapped verse-0 queries yield an
//!   empty passage instead of a best-effort translation.
//!
//! Entries that fail to compile are logged, recorded on the table and
//! skipped; the table stays usable and reports through [`MappingTable::has_errors`].
//! Query misses fall back to re-reading the reference under the other
//! system, kept behind the single `translate_via_osis` helper.

use std::collections::HashMap;
use std::sync::Arc;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::{error, trace, warn};

use crate::error::{Result, VersemapError};
use crate::osis;
use crate::passage::Passage;
use crate::versification::{OtherHasher, Verse, VerseRange, Versification};

#[derive(Parser)]
#[grammar = "mapping.pest"]
struct SideParser;

pub const PART_MARKER: char = '!';

const ZEROS_UNMAPPED: &str = "zerosUnmapped";

// ------------- QualifiedKey -------------
/// A reference qualified by which side of the mapping it exists on.
///
/// `Present` keys carry a real range, possibly tagged with a sub-verse
/// part (stored without the marker character; rendering re-inserts it).
/// `AbsentInLeft` marks pivot material with no left counterpart, and
/// `AbsentInPivot` marks left material known only by a section name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum QualifiedKey {
    Present { key: VerseRange, part: Option<String> },
    AbsentInLeft,
    AbsentInPivot { section: String },
}

impl QualifiedKey {
    pub fn verse(verse: Verse) -> Self {
        Self::Present { key: VerseRange::single(verse), part: None }
    }
    pub fn range(&self) -> Option<&VerseRange> {
        match self {
            Self::Present { key, .. } => Some(key),
            _ => None,
        }
    }
    pub fn part(&self) -> Option<&str> {
        match self {
            Self::Present { part, .. } => part.as_deref(),
            _ => None,
        }
    }
    /// The same key with the part tag stripped.
    pub fn generic(&self) -> Self {
        match self {
            Self::Present { key, .. } => Self::Present { key: *key, part: None },
            other => other.clone(),
        }
    }
    /// Renders the key for display: `OSIS`, `OSIS!part`, or the literal
    /// section name for material absent in the pivot.
    pub fn render(&self, v11n: &Versification) -> String {
        match self {
            Self::Present { key, part } => {
                let mut out = osis::format_range(v11n, *key);
                if let Some(part) = part {
                    out.push(PART_MARKER);
                    out.push_str(part);
                }
                out
            }
            Self::AbsentInPivot { section } => section.clone(),
            Self::AbsentInLeft => String::new(),
        }
    }
}

// ------------- Entry sides -------------
#[derive(Debug)]
enum Side {
    Flag(String),
    // None is the bare '?' of an absence declaration; Some names a section
    Absent(Option<String>),
    Offset(i32),
    Refs(Vec<(VerseRange, Option<String>)>),
}

fn parse_side(v11n: &Versification, text: &str) -> Result<Side> {
    if text.is_empty() {
        return Err(VersemapError::EmptyReference);
    }
    let unknown = || VersemapError::UnknownReference(format!("{} ({})", text, v11n.name()));
    let mut pairs = SideParser::parse(Rule::side, text).map_err(|_| unknown())?;
    let side = pairs.next().ok_or_else(|| unknown())?;
    for inner in side.into_inner() {
        match inner.as_rule() {
            Rule::flag => return Ok(Side::Flag(inner.as_str()[1..].to_owned())),
            Rule::absent => {
                let section = inner.into_inner().next().map(|s| s.as_str().to_owned());
                return Ok(Side::Absent(section));
            }
            Rule::offset => {
                let offset = inner.as_str().parse::<i32>().map_err(|_| unknown())?;
                return Ok(Side::Offset(offset));
            }
            Rule::ref_list => {
                let mut refs = Vec::new();
                for ref_range in inner.into_inner() {
                    refs.push(parse_ref_range(v11n, ref_range)?);
                }
                return Ok(Side::Refs(refs));
            }
            Rule::EOI => (),
            _ => (),
        }
    }
    Err(unknown())
}

fn parse_ref_range(v11n: &Versification, pair: Pair<Rule>) -> Result<(VerseRange, Option<String>)> {
    let text = pair.as_str().to_owned();
    let mut start = None;
    let mut end = None;
    let mut part = None;
    for piece in pair.into_inner() {
        match piece.as_rule() {
            Rule::osis_ref => {
                let verse = osis::parse_verse(v11n, piece.as_str())?;
                if start.is_none() {
                    start = Some(verse);
                } else {
                    end = Some(verse);
                }
            }
            Rule::part => part = Some(piece.as_str()[1..].to_owned()),
            _ => (),
        }
    }
    let start = start.ok_or(VersemapError::EmptyReference)?;
    let range = match end {
        Some(end) => v11n.range(start, end)?,
        None => VerseRange::single(start),
    };
    // part tags only qualify single verses
    if part.is_some() && range.cardinality() != 1 {
        return Err(VersemapError::UnknownReference(format!("{} ({})", text, v11n.name())));
    }
    Ok((range, part))
}

fn exactly_one(refs: Vec<(VerseRange, Option<String>)>, v11n: &Versification, text: &str) -> Result<(VerseRange, Option<String>)> {
    let mut refs = refs.into_iter();
    match (refs.next(), refs.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(VersemapError::UnknownReference(format!("{} ({})", text, v11n.name()))),
    }
}

// ------------- Diagnostics -------------
/// A per-entry compile failure. Failed entries are skipped; the rest of
/// the table is unaffected.
#[derive(Debug)]
pub struct EntryDiagnostic {
    pub key: String,
    pub value: String,
    pub error: VersemapError,
}

// ------------- MappingTable -------------
/// The compiled mapping between a left versification and the pivot.
///
/// Construction consumes the entry stream once; afterwards the table is
/// read-only and safe to share between threads.
pub struct MappingTable {
    left: Arc<Versification>,
    pivot: Arc<Versification>,
    forward: HashMap<Verse, Vec<QualifiedKey>, OtherHasher>,
    reverse: HashMap<QualifiedKey, Passage, OtherHasher>,
    // pivot verses declared not to exist on the left
    absent: Passage,
    zeros_unmapped: bool,
    diagnostics: Vec<EntryDiagnostic>,
}

impl MappingTable {
    pub fn new(left: Arc<Versification>, pivot: Arc<Versification>, entries: &[(String, String)]) -> Self {
        let mut table = Self {
            left,
            absent: Passage::new(Arc::clone(&pivot)),
            pivot,
            forward: HashMap::default(),
            reverse: HashMap::default(),
            zeros_unmapped: false,
            diagnostics: Vec::new(),
        };
        for (key, value) in entries {
            if let Err(e) = table.process_entry(key, value) {
                error!(key = %key, value = %value, error = %e, "unable to process mapping entry");
                table.diagnostics.push(EntryDiagnostic {
                    key: key.clone(),
                    value: value.clone(),
                    error: e,
                });
            }
        }
        table.trace_dump();
        table
    }

    pub fn left(&self) -> &Arc<Versification> {
        &self.left
    }
    pub fn pivot(&self) -> &Arc<Versification> {
        &self.pivot
    }
    /// Whether any entry failed to compile.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
    pub fn diagnostics(&self) -> &[EntryDiagnostic] {
        &self.diagnostics
    }
    /// Pivot verses declared absent on the left.
    pub fn absent(&self) -> &Passage {
        &self.absent
    }

    // ------------- entry expansion -------------
    fn process_entry(&mut self, key: &str, value: &str) -> Result<()> {
        match parse_side(&self.left, key)? {
            Side::Flag(name) if name == ZEROS_UNMAPPED => {
                self.zeros_unmapped = true;
                Ok(())
            }
            Side::Flag(name) => Err(VersemapError::UnknownReference(format!("!{}", name))),
            Side::Absent(None) => match parse_side(&self.pivot, value)? {
                // the value lists pivot verses with no left counterpart
                Side::Refs(refs) => {
                    for (range, part) in refs {
                        if part.is_some() {
                            return Err(VersemapError::UnknownReference(format!(
                                "{} ({})", value, self.pivot.name()
                            )));
                        }
                        self.absent.add_range(range);
                    }
                    Ok(())
                }
                Side::Offset(_) => Err(VersemapError::OffsetWithoutBasis),
                _ => Err(VersemapError::UnknownReference(format!("{} ({})", value, self.pivot.name()))),
            },
            // a named section on the left has no defined meaning
            Side::Absent(Some(_)) => {
                Err(VersemapError::UnknownReference(format!("{} ({})", key, self.left.name())))
            }
            // an offset needs a basis from the other side
            Side::Offset(_) => Err(VersemapError::OffsetWithoutBasis),
            Side::Refs(refs) => {
                let (left_range, _left_part) = exactly_one(refs, &self.left, key)?;
                let pivot_key = match parse_side(&self.pivot, value)? {
                    Side::Absent(Some(section)) => QualifiedKey::AbsentInPivot { section },
                    Side::Offset(offset) => self.resolve_offset(left_range, offset)?,
                    Side::Refs(refs) => {
                        let (range, part) = exactly_one(refs, &self.pivot, value)?;
                        QualifiedKey::Present { key: range, part }
                    }
                    _ => {
                        return Err(VersemapError::UnknownReference(format!(
                            "{} ({})", value, self.pivot.name()
                        )))
                    }
                };
                self.add_mappings(left_range, pivot_key)
            }
        }
    }

    /// Resolves a `+N`/`-N` value against the basis range parsed from the
    /// left side: the start moves by N under the pivot's arithmetic and the
    /// cardinality is kept.
    fn resolve_offset(&self, basis: VerseRange, offset: i32) -> Result<QualifiedKey> {
        let start = self.pivot.transpose(&self.left, basis.start())?;
        let start = if offset < 0 {
            self.pivot.subtract(start, offset.unsigned_abs())?
        } else {
            self.pivot.add(start, offset as u32)?
        };
        if basis.cardinality() > 1 {
            // the end must exist too; offsets may cross chapter and book
            // boundaries but not run past the pivot
            self.pivot.add(start, basis.cardinality() - 1)?;
        }
        Ok(QualifiedKey::Present { key: VerseRange::new(start, basis.cardinality()), part: None })
    }

    fn add_mappings(&mut self, left_range: VerseRange, pivot_key: QualifiedKey) -> Result<()> {
        if left_range.cardinality() == 1 {
            self.add_one_to_many(left_range.start(), pivot_key);
            Ok(())
        } else {
            self.add_many_to_many(left_range, pivot_key)
        }
    }

    fn add_one_to_many(&mut self, left: Verse, pivot_key: QualifiedKey) {
        self.push_forward(left, pivot_key.clone());
        match &pivot_key {
            QualifiedKey::Present { key, .. } if key.cardinality() != 1 => {
                // expand the range; parts never qualify ranges
                let verses: Vec<Verse> = self.pivot.verses(*key).collect();
                for verse in verses {
                    self.push_reverse(&QualifiedKey::verse(verse), left);
                }
            }
            _ => self.push_reverse(&pivot_key, left),
        }
    }

    /// Pairs the verses of both ranges index by index. A pivot side of
    /// cardinality 1 collects every left verse instead. When the two sides
    /// differ in length by exactly one, verse 0 is skipped wherever it
    /// appears: the left side before the pivot side is consumed.
    fn add_many_to_many(&mut self, left_range: VerseRange, pivot_key: QualifiedKey) -> Result<()> {
        let pivot_range = match &pivot_key {
            QualifiedKey::Present { key, .. } => Some(*key),
            _ => None,
        };
        let pivot_many = pivot_range.map_or(false, |r| r.cardinality() != 1);
        let mut skip_zero = false;
        if let Some(pivot_range) = pivot_range.filter(|_| pivot_many) {
            let diff = (left_range.cardinality() as i64 - pivot_range.cardinality() as i64).abs();
            if diff > 1 {
                return Err(self.cardinality_error(left_range, pivot_range));
            }
            skip_zero = diff == 1;
        }

        let lefts: Vec<Verse> = self.left.verses(left_range).collect();
        let pivots: Vec<Verse> = match pivot_range.filter(|_| pivot_many) {
            Some(range) => self.pivot.verses(range).collect(),
            None => Vec::new(),
        };
        let mut cursor = 0usize;
        for left_verse in lefts {
            if pivot_many {
                if skip_zero && left_verse.verse() == 0 {
                    continue;
                }
                let mut pivot_verse = *pivots
                    .get(cursor)
                    .ok_or_else(|| self.cardinality_error(left_range, pivot_range.unwrap_or(left_range)))?;
                cursor += 1;
                if skip_zero && pivot_verse.verse() == 0 {
                    pivot_verse = *pivots
                        .get(cursor)
                        .ok_or_else(|| self.cardinality_error(left_range, pivot_range.unwrap_or(left_range)))?;
                    cursor += 1;
                }
                let pivot_key = QualifiedKey::verse(pivot_verse);
                self.push_forward(left_verse, pivot_key.clone());
                self.push_reverse(&pivot_key, left_verse);
            } else {
                self.push_forward(left_verse, pivot_key.clone());
                self.push_reverse(&pivot_key, left_verse);
            }
        }
        if pivot_many && cursor < pivots.len() {
            return Err(self.cardinality_error(left_range, pivot_range.unwrap_or(left_range)));
        }
        Ok(())
    }

    fn cardinality_error(&self, left: VerseRange, pivot: VerseRange) -> VersemapError {
        VersemapError::CardinalityMismatch {
            left: osis::format_range(&self.left, left),
            left_count: left.cardinality(),
            pivot: osis::format_range(&self.pivot, pivot),
            pivot_count: pivot.cardinality(),
        }
    }

    fn push_forward(&mut self, left: Verse, pivot_key: QualifiedKey) {
        self.forward.entry(left).or_insert_with(Vec::new).push(pivot_key);
    }

    /// Accumulates a left verse into the pivot key's bucket. A key carrying
    /// a part also feeds the generic bucket, so that a pivot lookup without
    /// part information resolves to the union of all parts.
    fn push_reverse(&mut self, pivot_key: &QualifiedKey, left: Verse) {
        let left_v11n = Arc::clone(&self.left);
        self.reverse
            .entry(pivot_key.clone())
            .or_insert_with(|| Passage::new(Arc::clone(&left_v11n)))
            .add(left);
        if pivot_key.part().is_some() {
            self.reverse
                .entry(pivot_key.generic())
                .or_insert_with(|| Passage::new(left_v11n))
                .add(left);
        }
    }

    // ------------- queries -------------
    /// Maps a left verse to its pivot passage. On an index miss the
    /// reference is re-read under the pivot system.
    pub fn map(&self, left: Verse) -> Passage {
        match self.forward.get(&left) {
            Some(keys) => {
                let mut out = Passage::new(Arc::clone(&self.pivot));
                for key in keys {
                    if let QualifiedKey::Present { key, .. } = key {
                        out.add_range(*key);
                    }
                }
                out
            }
            None => self.translate_via_osis(&self.left, VerseRange::single(left), &self.pivot),
        }
    }

    /// Like [`MappingTable::map`] but keeps part tags and absent section
    /// names, for rendering.
    pub fn map_to_qualified(&self, left: Verse) -> Vec<QualifiedKey> {
        if let Some(keys) = self.forward.get(&left) {
            return keys.clone();
        }
        let translated = self.translate_via_osis(&self.left, VerseRange::single(left), &self.pivot);
        translated
            .ranges()
            .into_iter()
            .map(|key| QualifiedKey::Present { key, part: None })
            .collect()
    }

    /// Maps a pivot verse back to its left passage.
    pub fn unmap(&self, pivot: Verse) -> Passage {
        self.unmap_qualified(&QualifiedKey::verse(pivot))
    }

    pub fn unmap_qualified(&self, pivot_key: &QualifiedKey) -> Passage {
        if let Some(passage) = self.reverse.get(pivot_key) {
            return passage.clone();
        }
        if pivot_key.part().is_some() {
            // try again without the part
            if let Some(passage) = self.reverse.get(&pivot_key.generic()) {
                return passage.clone();
            }
        }
        match pivot_key.range() {
            Some(range) => {
                if self.pivot.verses(*range).all(|verse| self.absent.contains(verse)) {
                    return Passage::new(Arc::clone(&self.left));
                }
                self.translate_via_osis(&self.pivot, *range, &self.left)
            }
            None => Passage::new(Arc::clone(&self.left)),
        }
    }

    // ------------- string forms -------------
    /// Maps a single left OSIS verse reference, returning the pivot OSIS
    /// reference (empty when nothing corresponds).
    pub fn map_str(&self, key: &str) -> Result<String> {
        let (verse, _part) = self.single_verse(&self.left, key)?;
        Ok(self.map(verse).osis_ref())
    }

    /// Maps a single left OSIS verse reference to the space-joined rendering
    /// of its qualified keys.
    pub fn map_to_qualified_str(&self, key: &str) -> Result<String> {
        let (verse, _part) = self.single_verse(&self.left, key)?;
        let keys = self.map_to_qualified(verse);
        Ok(keys
            .iter()
            .map(|key| key.render(&self.pivot))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Unmaps a single pivot OSIS verse reference, which may carry a
    /// `!part` tag, returning the left OSIS reference.
    pub fn unmap_str(&self, key: &str) -> Result<String> {
        let (verse, part) = self.single_verse(&self.pivot, key)?;
        let pivot_key = QualifiedKey::Present { key: VerseRange::single(verse), part };
        Ok(self.unmap_qualified(&pivot_key).osis_ref())
    }

    fn single_verse(&self, v11n: &Versification, text: &str) -> Result<(Verse, Option<String>)> {
        match parse_side(v11n, text)? {
            Side::Refs(refs) => {
                let mut refs = refs.into_iter();
                match (refs.next(), refs.next()) {
                    (Some((range, part)), None) if range.cardinality() == 1 => {
                        Ok((range.start(), part))
                    }
                    _ => Err(VersemapError::UnsupportedMultiVerseLookup(text.to_owned())),
                }
            }
            _ => Err(VersemapError::UnknownReference(format!("{} ({})", text, v11n.name()))),
        }
    }

    // ------------- fallback -------------
    /// The best-effort translation used on index misses: the reference is
    /// serialized under its own system and re-read under the target. With
    /// `!zerosUnmapped` set, a sole verse 0 yields an empty passage instead.
    fn translate_via_osis(&self, from: &Versification, range: VerseRange, to: &Arc<Versification>) -> Passage {
        if self.zeros_unmapped && range.cardinality() == 1 && range.start().verse() == 0 {
            return Passage::new(Arc::clone(to));
        }
        let reference = osis::format_range(from, range);
        match osis::parse_passage(to, &reference) {
            Ok(passage) => passage,
            Err(e) => {
                warn!(reference = %reference, target = %to.name(), error = %e,
                    "unable to transfer reference between versifications");
                Passage::new(Arc::clone(to))
            }
        }
    }

    // ------------- trace -------------
    /// Dumps both indexes at trace level after construction.
    fn trace_dump(&self) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        trace!("forward mappings towards {}", self.pivot.name());
        for (left, keys) in &self.forward {
            for key in keys {
                trace!(
                    "({}) {} => {} ({})",
                    self.left.name(),
                    osis::format_verse(&self.left, *left),
                    key.render(&self.pivot),
                    self.pivot.name()
                );
            }
        }
        trace!("absent in {}: [{}]", self.left.name(), self.absent.osis_ref());
        trace!("backwards mappings from {}", self.pivot.name());
        for (key, passage) in &self.reverse {
            trace!(
                "({}) {} => {} ({})",
                self.pivot.name(),
                key.render(&self.pivot),
                passage.osis_ref(),
                self.left.name()
            );
        }
    }
}
