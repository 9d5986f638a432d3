//! Mapping file loader.
//!
//! Mapping tables live in properties-like text files: one `key=value`
//! entry per line, `#` comments, blank lines ignored. Duplicate keys are
//! legal and additive, so entries are kept as an ordered list rather than
//! a map. Lines without a `=` (the global flags) become entries with an
//! empty value.

use std::fs;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Default)]
pub struct MappingSource {
    entries: Vec<(String, String)>,
}

impl MappingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => entries.push((key.trim().to_owned(), value.trim().to_owned())),
                None => entries.push((line.to_owned(), String::new())),
            }
        }
        Self { entries }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_text(&fs::read_to_string(path)?))
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.entries.push((key.to_owned(), value.to_owned()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
