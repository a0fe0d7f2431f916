pub mod editor;
pub mod engine;
pub mod grid;
pub mod import;
pub mod tree;

////////////////////////////////////////////////
/// kura
/// * Editor tooling for module/asset databases.
///
/// * `engine` is the database side: module manifests, asset definition files,
///   field introspection, and the `AssetSource` link the tools depend on.
/// * `tree` and `grid` build the display structures (asset hierarchy and
///   property rows) from that data.
/// * `import` runs the mesh/texture/material creation flows.
/// * `editor` is the egui front end: the Project Tool and Materials Tool
///   panels and the app that hosts them.
////////////////////////////////////////////////
pub use engine::{AssetSource, ProjectLink, ProjectLoader};
pub use tree::AssetTree;
