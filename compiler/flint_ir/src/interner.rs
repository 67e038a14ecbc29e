//! String interner for identifiers and string literals.
//!
//! The interpreter is single-threaded, so the interner uses `RefCell`
//! interior mutability instead of locks. Interned strings are handed out
//! as cheap `Rc<str>` clones.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default)]
struct InternerState {
    /// Map from string content to its index in `strings`.
    map: FxHashMap<Rc<str>, Name>,
    /// Storage for interned strings, indexed by `Name`.
    strings: Vec<Rc<str>>,
}

/// Interner mapping strings to compact [`Name`] ids.
///
/// `Name`s are only meaningful to the interner that produced them, so one
/// interner must be shared across a whole scan/parse/interpret pipeline
/// (and across successive REPL entries).
#[derive(Default)]
pub struct StringInterner {
    state: RefCell<InternerState>,
}

impl StringInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same content twice returns the same `Name`.
    pub fn intern(&self, s: &str) -> Name {
        let mut state = self.state.borrow_mut();
        if let Some(&name) = state.map.get(s) {
            return name;
        }
        let name = Name::from_raw(state.strings.len() as u32);
        let stored: Rc<str> = Rc::from(s);
        state.strings.push(Rc::clone(&stored));
        state.map.insert(stored, name);
        name
    }

    /// Look up the string for a `Name`.
    ///
    /// # Panics
    /// Panics if `name` did not come from this interner.
    pub fn lookup(&self, name: Name) -> Rc<str> {
        Rc::clone(&self.state.borrow().strings[name.index()])
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.state.borrow().strings.len()
    }

    /// Check if the interner is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
