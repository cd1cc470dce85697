//! String interning for snake identifiers and label fields.
//!
//! Identifiers and labels are compared constantly during a game; interning
//! turns the common case into a pointer compare and keeps one copy of every
//! string alive for as long as anything references it. The pool is shared
//! across games and grows only.
use fxhash::FxHashSet;
use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

fn empty_str() -> &'static Arc<str> {
    static EMPTY: OnceLock<Arc<str>> = OnceLock::new();
    EMPTY.get_or_init(|| Arc::from(""))
}

/// A string handed out by a [`StringPool`]. Cheap to clone and to compare:
/// two handles from the same pool share storage, so equality checks the
/// pointer first and falls back to contents only for strings interned
/// elsewhere.
#[derive(Debug, Clone)]
pub struct InternedStr(Arc<str>);

impl InternedStr {
    /// view as a plain string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// whether the underlying string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for InternedStr {
    fn default() -> Self {
        InternedStr(empty_str().clone())
    }
}

impl PartialEq for InternedStr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for InternedStr {}

impl PartialEq<str> for InternedStr {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for InternedStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for InternedStr {
    // hashes the contents, so lookups by `&str` agree via `Borrow`
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Borrow<str> for InternedStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Write-only-grow registry of canonical strings. `add` is atomic and
/// idempotent; holders of [`InternedStr`] values never need the lock.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Mutex<FxHashSet<Arc<str>>>,
}

impl StringPool {
    /// an empty pool
    pub fn new() -> Self {
        StringPool::default()
    }

    /// Interns `s`, returning the canonical copy. Calling twice with equal
    /// strings returns handles sharing the same storage.
    pub fn add(&self, s: &str) -> InternedStr {
        let mut strings = self.strings.lock().expect("string pool lock poisoned");
        if let Some(existing) = strings.get(s) {
            return InternedStr(existing.clone());
        }
        let canonical: Arc<str> = Arc::from(s);
        strings.insert(canonical.clone());
        InternedStr(canonical)
    }

    /// number of distinct strings interned so far
    pub fn len(&self) -> usize {
        self.strings.lock().expect("string pool lock poisoned").len()
    }

    /// whether the pool has interned anything yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
