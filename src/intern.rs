//! Interns [`AbsoluteIdentifier`]s to dense [`Key`]s (spec.md §3, §4.5).
//!
//! Grounded in the teacher project's string interner (`intern.rs`'s
//! `Interner`/`Symbol` pair): a `Vec` for key -> value and a `HashMap` for
//! value -> key, with keys handed out in strict insertion order. The
//! difference from that interner is that entries here are multi-segment
//! identifiers that also carry their own key back, matching the
//! `add_ident`/`add_ident_or_get_key` contract from
//! `examples/original_source/include/lesfl/frontend/ident.hpp`.

use std::collections::HashMap;
use std::fmt;

use crate::ident::{AbsoluteIdentifier, Key};

/// Returned by [`AbsoluteIdentifierTable::add_ident`] when the identifier
/// is already present under a different (or the same) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadyPresent {
    pub existing_key: Key,
}

impl fmt::Display for AlreadyPresent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identifier already interned under key {}",
            self.existing_key.index()
        )
    }
}

impl std::error::Error for AlreadyPresent {}

/// Bidirectional `key <-> AbsoluteIdentifier` table.
///
/// Keys are assigned in strictly increasing insertion order starting at
/// 0; each distinct segment sequence is stored exactly once (spec.md
/// §3 invariants).
#[derive(Default)]
pub struct AbsoluteIdentifierTable {
    by_key: Vec<AbsoluteIdentifier>,
    by_segments: HashMap<Vec<String>, Key>,
}

impl AbsoluteIdentifierTable {
    pub fn new() -> Self {
        AbsoluteIdentifierTable {
            by_key: Vec::new(),
            by_segments: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Looks up an already-interned identifier by key.
    pub fn ident(&self, key: Key) -> Option<&AbsoluteIdentifier> {
        self.by_key.get(key.index() as usize)
    }

    /// Looks up an identifier by structural value. If `orig` already
    /// carries a key, the lookup still goes through the segment map (the
    /// carried key is not trusted blindly), but the returned entry is the
    /// one this table actually owns under that key.
    pub fn ident_by_value(&self, orig: &AbsoluteIdentifier) -> Option<&AbsoluteIdentifier> {
        let key = self.by_segments.get(orig.segments())?;
        self.ident(*key)
    }

    /// Interns `ident`, failing if a structurally equal identifier is
    /// already present. On success, `ident` is stamped with its key and
    /// moved into the table; the caller's copy is considered to no longer
    /// be the table's canonical owner.
    pub fn add_ident(&mut self, mut ident: AbsoluteIdentifier) -> Result<Key, AlreadyPresent> {
        if let Some(&existing_key) = self.by_segments.get(ident.segments()) {
            return Err(AlreadyPresent { existing_key });
        }
        let key = Key::new(self.by_key.len() as u64);
        ident.set_key(key);
        self.by_segments.insert(ident.segments().to_vec(), key);
        self.by_key.push(ident);
        tracing::trace!(key = key.index(), "interned absolute identifier");
        Ok(key)
    }

    /// Idempotent variant: returns the existing key (and `is_added =
    /// false`) if already present, otherwise inserts and returns
    /// `is_added = true`.
    pub fn add_ident_or_get_key(&mut self, ident: AbsoluteIdentifier) -> (Key, bool) {
        if let Some(&existing_key) = self.by_segments.get(ident.segments()) {
            return (existing_key, false);
        }
        let key = self
            .add_ident(ident)
            .expect("just checked absence under the lock of this &mut self call");
        (key, true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &AbsoluteIdentifier)> {
        self.by_key
            .iter()
            .enumerate()
            .map(|(i, ident)| (Key::new(i as u64), ident))
    }
}
