use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::fields::FieldValue;

pub const ASSET_ID_DELIMITER: char = ':';

/// Metadata record for one declared content asset.
///
/// Owned by the asset database; the tree builder and panels only borrow these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDefinition {
    /// Full identifier of the form `"<moduleId>:<assetName>"`.
    pub asset_id: String,
    /// Type tag, e.g. `"MeshAsset"`.
    pub asset_type: String,
    /// Identifier of the owning module.
    pub module_id: String,
    /// Definition file on disk, relative to the module directory.
    pub file_path: PathBuf,
}

/// A loaded content module: a directory of declared assets under the project
/// root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDefinition {
    pub module_id: String,
    pub version_id: u32,
    /// Absolute path of the module directory.
    pub path: PathBuf,
    /// Definition files declared by the module, relative to `path`.
    pub declared_assets: Vec<PathBuf>,
}

impl ModuleDefinition {
    pub fn module_path(&self) -> &PathBuf {
        &self.path
    }
}

/// On-disk `module.json` manifest.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModuleManifest {
    pub module_id: String,
    #[serde(default)]
    pub version_id: u32,
    #[serde(default)]
    pub declared_assets: Vec<PathBuf>,
}

/// On-disk `<name>.asset.json` definition file.
///
/// `fields` is a BTreeMap so serialized files are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetDefinitionFile {
    pub asset_name: String,
    pub asset_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

/// Splits an asset identifier into its module and asset name parts at the
/// first delimiter.
///
/// When the delimiter is absent the whole identifier is treated as the module
/// name and the asset name is `None`; callers fall back to displaying the full
/// identifier.
pub fn split_asset_id(asset_id: &str) -> (&str, Option<&str>) {
    match asset_id.split_once(ASSET_ID_DELIMITER) {
        Some((module, name)) => (module, Some(name)),
        None => (asset_id, None),
    }
}

/// Joins a module id and asset name into a full asset identifier.
pub fn make_asset_id(module_id: &str, asset_name: &str) -> String {
    format!("{module_id}{ASSET_ID_DELIMITER}{asset_name}")
}

/// Human-readable display label for an asset-type tag.
///
/// Unrecognized tags pass through unchanged.
pub fn category_label(asset_type: &str) -> &str {
    match asset_type {
        "EntityTemplateAsset" => "Object Templates",
        "MaterialAsset" => "Materials",
        "MeshAsset" => "Meshes",
        "ImageAsset" => "Images",
        "ShaderAsset" => "Shaders",
        other => other,
    }
}
