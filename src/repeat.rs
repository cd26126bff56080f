//! The repeat-loop runtime.
//!
//! A `repeat` directive materializes its source into a [`Cursor`], which
//! the generated loop body advances. A [`RepeatItem`] is a read-only view
//! over the same cursor, deriving every position property from how far
//! the cursor has advanced at the moment of the read. The [`RepeatStore`]
//! holds one cursor per loop variable and hands out at most one view for
//! each.

use crate::error::{Error, ErrorKind};
use serde::Serialize;
use serde_json::{to_value, Value};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// The subtractive Roman numeral value table.
const ROMAN: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

#[derive(Debug)]
struct Shared {
    items: Vec<Value>,
    next: usize,
}

/// An iteration position over a materialized repeat source.
///
/// Cloning a [`Cursor`] produces another handle over the same shared
/// position; the render loop advances one handle while the
/// [`RepeatItem`] reads the other.
#[derive(Debug, Clone)]
pub struct Cursor {
    shared: Rc<RefCell<Shared>>,
}

impl Cursor {
    fn new(items: Vec<Value>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared { items, next: 0 })),
        }
    }

    /// Return how many elements have not yet been consumed.
    pub fn remaining(&self) -> usize {
        let shared = self.shared.borrow();

        shared.items.len() - shared.next
    }
}

impl Iterator for Cursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let mut shared = self.shared.borrow_mut();
        let value = shared.items.get(shared.next).cloned()?;
        shared.next += 1;

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cursor {}

/// A read-only, position-derived view over one loop's [`Cursor`].
///
/// Every property is recomputed from the live cursor on each access, so
/// a `RepeatItem` is only meaningful while the loop that owns the cursor
/// is between steps.
///
/// # Examples
///
/// ```
/// use tal::RepeatStore;
///
/// let mut store = RepeatStore::new();
/// let (mut cursor, _) = store.register("fruit", ["apple", "pear"]).unwrap();
/// let item = store.lookup("fruit").unwrap();
///
/// cursor.next();
/// assert_eq!(item.index(), 0);
/// assert_eq!(item.letter().unwrap(), "a");
///
/// cursor.next();
/// assert_eq!(item.index(), 1);
/// assert!(item.end());
/// ```
#[derive(Debug)]
pub struct RepeatItem {
    length: usize,
    cursor: Cursor,
}

impl RepeatItem {
    fn new(cursor: Cursor, length: usize) -> Self {
        Self { length, cursor }
    }

    /// Return the total number of elements in the loop.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Return the current zero-based position.
    ///
    /// Derived from the cursor at read time; -1 before the first step.
    pub fn index(&self) -> i64 {
        self.length as i64 - self.cursor.remaining() as i64 - 1
    }

    /// Return true when the cursor is on the first element.
    pub fn start(&self) -> bool {
        self.index() == 0
    }

    /// Return true when the cursor is on the last element.
    pub fn end(&self) -> bool {
        self.index() == self.length as i64 - 1
    }

    /// Return the current one-based position.
    pub fn number(&self) -> i64 {
        self.index() + 1
    }

    /// Return "odd" when the position is odd, otherwise an empty string.
    pub fn odd(&self) -> &'static str {
        if self.index() % 2 != 0 {
            "odd"
        } else {
            ""
        }
    }

    /// Return "even" when the position is even, otherwise an empty string.
    pub fn even(&self) -> &'static str {
        if self.index() % 2 == 0 {
            "even"
        } else {
            ""
        }
    }

    /// Return the position as a lower-case letter label.
    ///
    /// Position 0 is "a", 25 is "z", and 26 wraps to "ba".
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::NoPosition`] when the
    /// cursor has not been advanced yet.
    pub fn letter(&self) -> Result<String, Error> {
        self.alpha(b'a')
    }

    /// Return the position as an upper-case letter label.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::NoPosition`] when the
    /// cursor has not been advanced yet.
    pub fn capital_letter(&self) -> Result<String, Error> {
        self.alpha(b'A')
    }

    fn alpha(&self, base: u8) -> Result<String, Error> {
        let mut index = self.index();
        if index < 0 {
            return Err(Error::build(ErrorKind::NoPosition, "no iteration position"));
        }

        let mut label = String::new();
        loop {
            let offset = (index % 26) as u8;
            index /= 26;
            label.insert(0, (base + offset) as char);
            if index == 0 {
                return Ok(label);
            }
        }
    }

    /// Return the position as an upper-case Roman numeral.
    ///
    /// Position 0 is "I". Before the first step there is no numeral and
    /// the result is empty.
    pub fn capital_roman(&self) -> String {
        let mut n = self.number();
        let mut numeral = String::new();

        for (value, glyph) in ROMAN {
            let count = n / value;
            for _ in 0..count {
                numeral.push_str(glyph);
            }
            n %= value;
        }

        numeral
    }

    /// Return the position as a lower-case Roman numeral.
    pub fn roman(&self) -> String {
        self.capital_roman().to_lowercase()
    }

    /// Advancement through the view is unsupported; only the render loop
    /// that owns the cursor may step it.
    ///
    /// # Errors
    ///
    /// Always returns an [`Error`] of kind [`ErrorKind::Immutable`].
    pub fn advance(&self) -> Result<(), Error> {
        Err(
            Error::build(ErrorKind::Immutable, "repeat variable cannot be advanced")
                .with_help("the loop advances its own cursor, a repeat view is read-only"),
        )
    }
}

#[derive(Debug)]
struct Slot {
    cursor: Cursor,
    length: usize,
    item: Option<Rc<RepeatItem>>,
}

/// Provides storage for the cursors and views of every repeat loop in
/// one render.
///
/// Each render invocation owns its own `RepeatStore`; it is never shared
/// across renders.
#[derive(Debug, Default)]
pub struct RepeatStore {
    data: HashMap<String, Slot>,
}

impl RepeatStore {
    /// Create a new [`RepeatStore`].
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Materialize the given source and register it under the loop
    /// variable name, returning the cursor and total length.
    ///
    /// The source is coerced through [`Value`]: an array iterates its
    /// elements, a string its characters, an object its keys, and a
    /// null value is an empty loop. Registering a name again replaces
    /// the prior entry, view included, giving shadowing semantics for
    /// nested loops over the same variable.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::NotIterable`] if the
    /// source serializes to a number or boolean, or does not serialize
    /// at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use tal::RepeatStore;
    ///
    /// let mut store = RepeatStore::new();
    /// let (cursor, length) = store.register("item", [1, 2, 3]).unwrap();
    ///
    /// assert_eq!(length, 3);
    /// assert_eq!(cursor.count(), 3);
    /// ```
    pub fn register<S, T>(&mut self, name: S, source: T) -> Result<(Cursor, usize), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let value = to_value(source).map_err(|_| {
            Error::build(ErrorKind::NotIterable, "repeat source is unserializable")
        })?;

        let items = match value {
            Value::Null => vec![],
            Value::Array(items) => items,
            Value::String(text) => text
                .chars()
                .map(|c| Value::String(c.to_string()))
                .collect(),
            Value::Object(map) => map.into_iter().map(|(key, _)| Value::String(key)).collect(),
            other => {
                return Err(Error::build(
                    ErrorKind::NotIterable,
                    format!("`{other}` is not iterable"),
                ))
            }
        };

        let length = items.len();
        let cursor = Cursor::new(items);

        self.data.insert(
            name.into(),
            Slot {
                cursor: cursor.clone(),
                length,
                item: None,
            },
        );

        Ok((cursor, length))
    }

    /// Return the [`RepeatItem`] view for the given loop variable.
    ///
    /// The view is built on first access and cached, so every lookup
    /// until the next registration returns the same instance.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::UnknownName`] if the
    /// name was never registered.
    pub fn lookup(&mut self, name: &str) -> Result<Rc<RepeatItem>, Error> {
        let slot = self.data.get_mut(name).ok_or_else(|| {
            Error::build(
                ErrorKind::UnknownName,
                format!("loop variable `{name}` is not registered"),
            )
        })?;

        let item = slot
            .item
            .get_or_insert_with(|| Rc::new(RepeatItem::new(slot.cursor.clone(), slot.length)));

        Ok(Rc::clone(item))
    }

    /// Return the [`RepeatItem`] view for the given loop variable, or
    /// None when the name was never registered.
    pub fn get(&mut self, name: &str) -> Option<Rc<RepeatItem>> {
        self.lookup(name).ok()
    }
}
