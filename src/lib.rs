//! cinebrief: structure cinematic video concepts into a JSON brief.
//!
//! The core is three pieces: the [`schema`] of a project document, the
//! [`auto_structure`] parser that turns loose notes into that document, and
//! the [`validate`] pass that reports gaps. [`actions`] applies edits as
//! whole-document replacements and [`snapshot`] packs a document into a
//! shareable URL fragment.

pub mod actions;
pub mod auto_structure;
pub mod document;
pub mod error_codes;
pub mod ids;
pub mod schema;
pub mod snapshot;
pub mod validate;

pub use actions::{apply, Action};
pub use auto_structure::auto_structure;
pub use schema::Project;
pub use snapshot::{decode_snapshot, encode_snapshot};
pub use validate::validate_project;
