//! Import flows dispatched from the module context menu: bring a mesh or
//! texture file into a module and declare the matching asset, or create a new
//! material from scratch. UI-free so the whole sequence is testable.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use tracing::info;

use crate::engine::{
    AssetDefinition, AssetSource, ModuleDefinition,
    assets::AssetDefinitionFile,
    fields::FieldValue,
    io::ProjectIoError,
    link::ProjectError,
    paths::{copy_into_dir, make_relative_path},
};

pub const ASSET_FILE_SUFFIX: &str = ".asset.json";

/// What the import wizard collected from the user.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub module_id: String,
    pub asset_name: String,
    pub source_file: PathBuf,
    pub import_dir: PathBuf,
    /// Copy the source file into the import directory first.
    pub copy_file: bool,
}

#[derive(Debug)]
pub enum ImportError {
    EmptyAssetName,
    Copy(ProjectIoError),
    Project(ProjectError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::EmptyAssetName => write!(f, "asset id is required"),
            ImportError::Copy(err) => write!(f, "failed to copy source file: {err}"),
            ImportError::Project(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::EmptyAssetName => None,
            ImportError::Copy(err) => Some(err),
            ImportError::Project(err) => Some(err),
        }
    }
}

impl From<ProjectError> for ImportError {
    fn from(value: ProjectError) -> Self {
        ImportError::Project(value)
    }
}

/// Initial import directory offered for meshes; the user can change it.
pub fn default_mesh_import_dir(module: &ModuleDefinition) -> PathBuf {
    module.module_path().join("meshes")
}

/// Initial import directory offered for textures.
pub fn default_texture_import_dir(module: &ModuleDefinition) -> PathBuf {
    module.module_path().join("textures")
}

/// Imports a mesh file as a `MeshAsset` in the requested module.
pub fn import_mesh(
    source: &mut dyn AssetSource,
    request: &ImportRequest,
) -> Result<AssetDefinition, ImportError> {
    import_file(source, request, "MeshAsset", "MeshFile")
}

/// Imports an image file as an `ImageAsset` in the requested module.
pub fn import_texture(
    source: &mut dyn AssetSource,
    request: &ImportRequest,
) -> Result<AssetDefinition, ImportError> {
    import_file(source, request, "ImageAsset", "ImageFile")
}

fn import_file(
    source: &mut dyn AssetSource,
    request: &ImportRequest,
    asset_type: &str,
    file_field: &str,
) -> Result<AssetDefinition, ImportError> {
    let asset_name = request.asset_name.trim();
    if asset_name.is_empty() {
        return Err(ImportError::EmptyAssetName);
    }

    let mut content_path = request.source_file.clone();
    if request.copy_file {
        content_path =
            copy_into_dir(&request.source_file, &request.import_dir).map_err(ImportError::Copy)?;
    }

    // The definition file references its payload relative to the directory it
    // lives in.
    let relative = make_relative_path(&content_path, &request.import_dir);
    let definition_path = request
        .import_dir
        .join(format!("{asset_name}{ASSET_FILE_SUFFIX}"));

    let definition = AssetDefinitionFile {
        asset_name: asset_name.to_string(),
        asset_type: asset_type.to_string(),
        fields: BTreeMap::from([
            ("AssetName".to_string(), FieldValue::text(asset_name)),
            (
                file_field.to_string(),
                FieldValue::text(relative.display().to_string()),
            ),
        ]),
    };

    let created = source.create_asset(&request.module_id, definition, &definition_path)?;
    info!(
        asset = %created.asset_id,
        kind = asset_type,
        file = %relative.display(),
        "import finished"
    );
    Ok(created)
}

/// Creates an empty `MaterialAsset` under the module's `materials` directory.
pub fn create_material(
    source: &mut dyn AssetSource,
    module_id: &str,
    asset_name: &str,
) -> Result<AssetDefinition, ImportError> {
    let asset_name = asset_name.trim();
    if asset_name.is_empty() {
        return Err(ImportError::EmptyAssetName);
    }

    let Some(module) = source.find_loaded_module(module_id) else {
        return Err(ImportError::Project(ProjectError::UnknownModule {
            module_id: module_id.to_string(),
        }));
    };

    let definition_path = module
        .module_path()
        .join("materials")
        .join(format!("{asset_name}{ASSET_FILE_SUFFIX}"));

    let definition = AssetDefinitionFile {
        asset_name: asset_name.to_string(),
        asset_type: "MaterialAsset".to_string(),
        fields: BTreeMap::from([("AssetName".to_string(), FieldValue::text(asset_name))]),
    };

    let created = source.create_asset(module_id, definition, &definition_path)?;
    info!(asset = %created.asset_id, "material created");
    Ok(created)
}
