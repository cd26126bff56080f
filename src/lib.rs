//! Tal - clause parsing and repeat-loop runtime for TAL-style template
//! attributes.
//!
//! The clause parsers turn raw directive attribute values into structured
//! data for a template compiler:
//!
//! ```
//! use tal::{parse_defines, parse_substitution, Scope, SubstitutionKind};
//!
//! let defines = parse_defines("global (a, b) some/path").unwrap();
//! assert_eq!(defines[0].scope, Scope::Global);
//!
//! let substitution = parse_substitution("structure body/text").unwrap();
//! assert_eq!(substitution.kind, SubstitutionKind::Structure);
//! ```
//!
//! The repeat runtime tracks loop positions during a render. The loop
//! body advances the cursor; the view derives its properties from the
//! cursor's live position:
//!
//! ```
//! use tal::RepeatStore;
//!
//! let mut store = RepeatStore::new();
//! let (mut cursor, _) = store.register("item", ["a", "b"]).unwrap();
//! let item = store.lookup("item").unwrap();
//!
//! cursor.next();
//! assert!(item.start());
//! assert_eq!(item.number(), 1);
//! ```

mod attribute;
mod clause;
mod error;
mod repeat;
mod syntax;

pub use attribute::{prepare_attributes, Attribute, PreparedAttribute, XMLNS_NS};
pub use clause::{
    parse_attributes, parse_defines, parse_substitution, split_parts, Define, Scope, Substitution,
    SubstitutionKind,
};
pub use error::{Error, ErrorKind};
pub use repeat::{Cursor, RepeatItem, RepeatStore};
pub use syntax::Directive;
