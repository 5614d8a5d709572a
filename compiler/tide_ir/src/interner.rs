//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Interior mutability lets the
//! resolver intern synthesized names (`anonymous|0`, mangled instance names)
//! through a shared `&StringInterner` while the program is borrowed mutably.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw`.
    strings: Vec<&'static str>,
}

/// Interner mapping strings to [`Name`]s.
///
/// Strings are leaked to obtain `'static` lifetimes; an interner lives for
/// the whole compilation, so nothing is ever freed early.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as
    /// [`Name::EMPTY`].
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        Self {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(&idx) = self.table.read().map.get(s) {
            return Name::from_raw(idx);
        }

        let mut table = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&idx) = table.map.get(s) {
            return Name::from_raw(idx);
        }

        let idx = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("string interner exceeded u32::MAX entries"));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Look up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&idx| Name::from_raw(idx))
    }

    /// Look up the string for a Name.
    ///
    /// Unknown names render as the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
