//! The asset-database side of the editor: definitions, modules, field
//! introspection, and the on-disk project link the panels talk to.

pub mod assets;
pub mod fields;
pub mod io;
pub mod link;
pub mod paths;

pub use assets::*;
pub use fields::{AssetBase, FieldDescriptor, FieldKind, FieldValue, field_schema};
pub use link::{AssetSource, ProjectError, ProjectLink, ProjectLoader};
