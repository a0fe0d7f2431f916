//! The egui tool panels and their wiring.
//!
//! Panels own only widget state; everything they show comes from an
//! [`AssetSource`](crate::engine::AssetSource) and every user action is
//! translated into a call on it.

pub mod app;
pub mod config;
pub mod materials_tool;
pub mod project_tool;

pub use app::EditorApp;
pub use config::EditorConfig;
