//! Interned identifiers.
//!
//! Declaration names, attribute names and attribute arguments are interned
//! once per arena so comparisons are integer compares.

use rustc_hash::FxHashMap;
use std::fmt;

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Single-threaded string interner owned by a tree arena.
#[derive(Clone, Debug)]
pub struct NameTable {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl NameTable {
    /// Create a table holding only the empty string.
    pub fn new() -> Self {
        let mut table = NameTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        table.strings.push(Box::from(""));
        table.map.insert(Box::from(""), Name::EMPTY);
        table
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let index = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("name table exceeded {} entries", u32::MAX));
        let name = Name(index);
        self.strings.push(Box::from(s));
        self.map.insert(Box::from(s), name);
        name
    }

    /// Look up the string for a name.
    ///
    /// Names from a different table resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.0 as usize).map_or("", |s| s)
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
