use std::fmt;

// used to keep the two-way association between OSIS book ids and book numbers
use bimap::BiMap;

// the hasher used by the mapper's indexes
use std::hash::BuildHasherDefault;
use seahash::SeaHasher;

use crate::error::{Result, VersemapError};

pub type BookId = u8;
pub type Ordinal = u32;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

// ------------- Verse -------------
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Verse {
    book: BookId,
    chapter: u16,
    verse: u16,
}
impl Verse {
    pub fn new(book: BookId, chapter: u16, verse: u16) -> Self {
        Self { book, chapter, verse }
    }
    pub fn book(&self) -> BookId {
        self.book
    }
    pub fn chapter(&self) -> u16 {
        self.chapter
    }
    pub fn verse(&self) -> u16 {
        self.verse
    }
}

// ------------- VerseRange -------------
// A contiguous run of verses given by its start and how many verses it covers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VerseRange {
    start: Verse,
    cardinality: u32,
}
impl VerseRange {
    pub fn new(start: Verse, cardinality: u32) -> Self {
        Self { start, cardinality: cardinality.max(1) }
    }
    pub fn single(start: Verse) -> Self {
        Self { start, cardinality: 1 }
    }
    pub fn start(&self) -> Verse {
        self.start
    }
    pub fn cardinality(&self) -> u32 {
        self.cardinality
    }
}

// ------------- Versification -------------
#[derive(Debug)]
struct Book {
    last_verse: Vec<u16>,
    // ordinal of the first verse of each chapter
    chapter_base: Vec<Ordinal>,
}

/// A verse numbering system: which books exist, how many chapters each book
/// has, how many verses each chapter has, and whether chapters carry a
/// verse 0 for material preceding verse 1.
///
/// Verses are given a dense ordinal in canonical order, which makes range
/// iteration and verse arithmetic plain integer work. Two handles are
/// considered equal when they carry the same name.
#[derive(Debug)]
pub struct Versification {
    name: String,
    books: Vec<Book>,
    by_osis: BiMap<String, BookId>,
    zero_verses: bool,
    total: Ordinal,
}

impl Versification {
    pub fn builder(name: &str) -> Builder {
        Builder::new(name)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn zero_verses(&self) -> bool {
        self.zero_verses
    }
    fn first_verse(&self) -> u16 {
        if self.zero_verses { 0 } else { 1 }
    }
    pub fn book_id(&self, osis: &str) -> Option<BookId> {
        self.by_osis.get_by_left(osis).copied()
    }
    pub fn book_osis(&self, book: BookId) -> Option<&str> {
        self.by_osis.get_by_right(&book).map(String::as_str)
    }
    pub fn last_verse(&self, book: BookId, chapter: u16) -> Option<u16> {
        if chapter == 0 {
            return None;
        }
        self.books
            .get(book as usize)
            .and_then(|b| b.last_verse.get(chapter as usize - 1))
            .copied()
    }
    pub fn contains(&self, v: Verse) -> bool {
        self.last_verse(v.book, v.chapter)
            .map_or(false, |last| v.verse >= self.first_verse() && v.verse <= last)
    }

    /// The ordinal of a verse within this system, in canonical order.
    pub fn ordinal(&self, v: Verse) -> Result<Ordinal> {
        let book = self.books.get(v.book as usize).ok_or_else(|| self.no_such(v))?;
        if v.chapter == 0 || v.chapter as usize > book.last_verse.len() {
            return Err(self.no_such(v));
        }
        let last = book.last_verse[v.chapter as usize - 1];
        let first = self.first_verse();
        if v.verse < first || v.verse > last {
            return Err(self.no_such(v));
        }
        Ok(book.chapter_base[v.chapter as usize - 1] + (v.verse - first) as Ordinal)
    }

    /// The verse carrying a given ordinal, or None when the ordinal lies
    /// beyond the end of the system.
    pub fn verse_at(&self, ordinal: Ordinal) -> Option<Verse> {
        if ordinal >= self.total {
            return None;
        }
        let book_idx = match self.books.partition_point(|b| b.chapter_base[0] <= ordinal) {
            0 => return None,
            n => n - 1,
        };
        let book = &self.books[book_idx];
        let chapter_idx = match book.chapter_base.partition_point(|base| *base <= ordinal) {
            0 => return None,
            n => n - 1,
        };
        let verse = self.first_verse() + (ordinal - book.chapter_base[chapter_idx]) as u16;
        Some(Verse::new(book_idx as BookId, (chapter_idx + 1) as u16, verse))
    }

    /// Moves a verse forward by n verses, crossing chapter and book
    /// boundaries as needed.
    pub fn add(&self, v: Verse, n: u32) -> Result<Verse> {
        let ordinal = self.ordinal(v)?;
        let target = ordinal
            .checked_add(n)
            .filter(|o| *o < self.total)
            .ok_or_else(|| self.no_such(v))?;
        self.verse_at(target).ok_or_else(|| self.no_such(v))
    }

    /// Moves a verse backward by n verses.
    pub fn subtract(&self, v: Verse, n: u32) -> Result<Verse> {
        let ordinal = self.ordinal(v)?;
        let target = ordinal.checked_sub(n).ok_or_else(|| self.no_such(v))?;
        self.verse_at(target).ok_or_else(|| self.no_such(v))
    }

    /// Builds the range covering start through end inclusive.
    pub fn range(&self, start: Verse, end: Verse) -> Result<VerseRange> {
        let s = self.ordinal(start)?;
        let e = self.ordinal(end)?;
        if e < s {
            return Err(VersemapError::UnknownReference(format!(
                "backwards range in {}", self.name
            )));
        }
        Ok(VerseRange::new(start, e - s + 1))
    }

    /// Iterates the verses of a range in canonical order.
    pub fn verses(&self, range: VerseRange) -> Verses<'_> {
        match self.ordinal(range.start()) {
            Ok(ordinal) => Verses { v11n: self, next: ordinal, remaining: range.cardinality() },
            Err(_) => Verses { v11n: self, next: 0, remaining: 0 },
        }
    }

    /// Reinterprets another system's verse under this system, locating it
    /// by OSIS book id and keeping chapter and verse numbers.
    pub fn transpose(&self, from: &Versification, v: Verse) -> Result<Verse> {
        let osis = from.book_osis(v.book()).ok_or_else(|| {
            VersemapError::UnknownReference(format!("book {} ({})", v.book(), from.name))
        })?;
        let book = self.book_id(osis).ok_or_else(|| {
            VersemapError::UnknownReference(format!("{} ({})", osis, self.name))
        })?;
        let out = Verse::new(book, v.chapter(), v.verse());
        if !self.contains(out) {
            return Err(self.no_such(out));
        }
        Ok(out)
    }

    fn no_such(&self, v: Verse) -> VersemapError {
        let osis = self.book_osis(v.book).unwrap_or("?");
        VersemapError::UnknownReference(format!("{}.{}.{} ({})", osis, v.chapter, v.verse, self.name))
    }
}

impl PartialEq for Versification {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Versification {}
impl fmt::Display for Versification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub struct Verses<'a> {
    v11n: &'a Versification,
    next: Ordinal,
    remaining: u32,
}
impl Iterator for Verses<'_> {
    type Item = Verse;
    fn next(&mut self) -> Option<Verse> {
        if self.remaining == 0 {
            return None;
        }
        let verse = self.v11n.verse_at(self.next)?;
        self.remaining -= 1;
        self.next += 1;
        Some(verse)
    }
}

// ------------- Builder -------------
/// Assembles a [`Versification`] from per-book last-verse tables, in canon
/// order. Chapters are listed by the number of their last verse.
pub struct Builder {
    name: String,
    zero_verses: bool,
    books: Vec<(String, Vec<u16>)>,
}

impl Builder {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), zero_verses: true, books: Vec::new() }
    }
    pub fn zero_verses(mut self, zero_verses: bool) -> Self {
        self.zero_verses = zero_verses;
        self
    }
    pub fn book(mut self, osis: &str, last_verse: &[u16]) -> Self {
        self.books.push((osis.to_owned(), last_verse.to_vec()));
        self
    }
    pub fn build(self) -> Versification {
        let first = if self.zero_verses { 0u32 } else { 1u32 };
        let mut base: Ordinal = 0;
        let mut books = Vec::with_capacity(self.books.len());
        let mut by_osis = BiMap::new();
        for (osis, last_verse) in self.books.into_iter() {
            if last_verse.is_empty() {
                continue;
            }
            let mut chapter_base = Vec::with_capacity(last_verse.len());
            for last in &last_verse {
                chapter_base.push(base);
                base += (*last as u32 + 1).saturating_sub(first);
            }
            by_osis.insert(osis, books.len() as BookId);
            books.push(Book { last_verse, chapter_base });
        }
        Versification {
            name: self.name,
            books,
            by_osis,
            zero_verses: self.zero_verses,
            total: base,
        }
    }
}
