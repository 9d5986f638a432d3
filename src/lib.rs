//! Versemap – a bidirectional versification mapper.
//!
//! Scriptural reference systems number their material differently: verses
//! are added, removed, shifted across chapter boundaries, split, or gathered
//! under verse 0. Versemap compiles a declarative mapping table, written in
//! a compact shorthand, into two indexes that translate references between
//! an arbitrary "left" system and a fixed pivot system (conventionally the
//! KJV), in either direction:
//! * A [`versification::Versification`] names a system and owns its verse
//!   arithmetic (ordinals, ranges, chapter and book boundaries).
//! * A [`passage::Passage`] is an ordered set of verses within one system.
//! * The [`mapping::MappingTable`] holds the compiled forward and reverse
//!   indexes and answers `map` / `unmap` queries, with an OSIS round-trip
//!   as the best-effort fallback for unmapped references.
//!
//! ## Modules
//! * [`versification`] – verse numbering systems, ordinal arithmetic, the
//!   system [`versification::Builder`].
//! * [`system`] – bundled systems (the KJV pivot).
//! * [`osis`] – OSIS reference parsing and serialization.
//! * [`passage`] – verse set construction and rendering.
//! * [`mapping`] – the shorthand expander and the mapping table. Grammar
//!   details live in `mapping.pest`.
//! * [`loader`] – properties-like mapping file loading.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use versemap::loader::MappingSource;
//! use versemap::mapping::MappingTable;
//! use versemap::system;
//! let left = Arc::new(system::kjv());
//! let pivot = Arc::new(system::kjv());
//! let source = MappingSource::from_text("Gen.1.1=Gen.1.2");
//! let table = MappingTable::new(left, pivot, source.entries());
//! assert!(!table.has_errors());
//! assert_eq!(table.map_str("Gen.1.1").unwrap(), "Gen.1.2");
//! assert_eq!(table.unmap_str("Gen.1.2").unwrap(), "Gen.1.1");
//! ```
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod error;
pub mod loader;
pub mod mapping;
pub mod osis;
pub mod passage;
pub mod system;
pub mod versification;
