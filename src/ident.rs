//! Relative and absolute dotted identifiers (spec.md §3 "Identifiers").

use std::hash::{Hash, Hasher};

/// A dense, monotonically-assigned key standing in for an interned
/// [`AbsoluteIdentifier`] (spec.md §3, GLOSSARY "Interned key").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    pub(crate) fn new(index: u64) -> Self {
        Key(index)
    }

    pub fn index(self) -> u64 {
        self.0
    }
}

/// One or more dotted name segments with no leading-dot marker, resolved
/// against the enclosing module's scope by the (out of scope) resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeIdentifier {
    segments: Vec<String>,
}

impl RelativeIdentifier {
    /// `segments` must be non-empty (spec.md §3); an empty vector indicates
    /// a bug in the caller, not a recoverable parse error, so this panics
    /// in debug builds rather than silently constructing an invalid node.
    pub fn new(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty(), "RelativeIdentifier requires >=1 segment");
        RelativeIdentifier { segments }
    }

    pub fn single(segment: impl Into<String>) -> Self {
        RelativeIdentifier::new(vec![segment.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn to_dotted_string(&self) -> String {
        self.segments.join(".")
    }
}

/// A dotted name rooted at the module tree's top (marked by a leading `.`
/// in source). The empty absolute identifier (zero segments) names the
/// root module itself and is a legal `import`/`module` target.
#[derive(Debug, Clone)]
pub struct AbsoluteIdentifier {
    segments: Vec<String>,
    key: Option<Key>,
}

impl AbsoluteIdentifier {
    pub fn new(segments: Vec<String>) -> Self {
        AbsoluteIdentifier { segments, key: None }
    }

    /// The empty absolute identifier: "the root module" (spec.md §3).
    pub fn root() -> Self {
        AbsoluteIdentifier::new(Vec::new())
    }

    /// Appends one relative identifier's segments to form a new absolute
    /// identifier rooted at `self` (mirrors the original C++
    /// `AbsoluteIdentifier(const AbsoluteIdentifier&, const RelativeIdentifier&)`
    /// constructor — see SPEC_FULL.md §F).
    pub fn joined_with(&self, rel: &RelativeIdentifier) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(rel.segments().iter().cloned());
        AbsoluteIdentifier::new(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn key(&self) -> Option<Key> {
        self.key
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub(crate) fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    pub fn unset_key(&mut self) {
        self.key = None;
    }

    /// The identifier of the module enclosing this one, i.e. all but the
    /// last segment. `None` for the root identifier (it has no enclosing
    /// module). Supplemented from the original `get_module_ident` — see
    /// SPEC_FULL.md §F.
    pub fn parent_module(&self) -> Option<AbsoluteIdentifier> {
        if self.segments.is_empty() {
            return None;
        }
        let parent = self.segments[..self.segments.len() - 1].to_vec();
        Some(AbsoluteIdentifier::new(parent))
    }

    pub fn to_dotted_string(&self) -> String {
        format!(".{}", self.segments.join("."))
    }
}

/// Equality is segment-wise, order-sensitive, and independent of any
/// interned key (spec.md §3, §9): two value-copies compare equal even if
/// only one has been interned.
impl PartialEq for AbsoluteIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for AbsoluteIdentifier {}

impl Hash for AbsoluteIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

/// Either form of identifier node the parser may construct in expression
/// or import position (spec.md §3 "Identifier" family).
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Relative(RelativeIdentifier),
    Absolute(AbsoluteIdentifier),
}

impl Identifier {
    pub fn is_absolute(&self) -> bool {
        matches!(self, Identifier::Absolute(_))
    }
}
