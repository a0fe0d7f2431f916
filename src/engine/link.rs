use std::{
    collections::{HashMap, HashSet},
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::engine::{
    assets::{AssetDefinition, AssetDefinitionFile, ModuleDefinition, ModuleManifest, make_asset_id},
    fields::{AssetBase, FieldValue},
    io::{ProjectIoError, read_json_file, write_json_file},
};

pub const MODULE_MANIFEST_NAME: &str = "module.json";

/// Capability surface the panels and builders depend on instead of a global
/// engine link.
pub trait AssetSource {
    /// Every declared asset across all loaded modules, in load order.
    fn declared_assets(&self) -> &[AssetDefinition];

    /// Fetches the loaded asset behind a declared definition, if any.
    fn asset_base(&self, asset_id: &str) -> Option<&AssetBase>;

    /// Overwrites one stored field value. Returns false when the asset is
    /// unknown; the caller skips.
    fn set_asset_field(&mut self, asset_id: &str, field: &str, value: FieldValue) -> bool;

    /// Looks up a loaded module by id.
    fn find_loaded_module(&self, module_id: &str) -> Option<&ModuleDefinition>;

    /// Writes a new definition file, declares it in the owning module, and
    /// registers the asset.
    fn create_asset(
        &mut self,
        module_id: &str,
        definition: AssetDefinitionFile,
        definition_path: &Path,
    ) -> Result<AssetDefinition, ProjectError>;
}

#[derive(Debug)]
pub enum ProjectError {
    MissingRoot(PathBuf),
    Module {
        path: PathBuf,
        error: ProjectIoError,
    },
    Asset {
        path: PathBuf,
        error: ProjectIoError,
    },
    UnknownModule {
        module_id: String,
    },
    DuplicateAsset {
        asset_id: String,
    },
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::MissingRoot(path) => {
                write!(f, "project root does not exist: {}", path.display())
            }
            ProjectError::Module { path, error } => {
                write!(f, "failed to load module {}: {}", path.display(), error)
            }
            ProjectError::Asset { path, error } => {
                write!(f, "failed to load asset {}: {}", path.display(), error)
            }
            ProjectError::UnknownModule { module_id } => {
                write!(f, "module '{module_id}' is not loaded")
            }
            ProjectError::DuplicateAsset { asset_id } => {
                write!(f, "asset '{asset_id}' already exists")
            }
        }
    }
}

impl std::error::Error for ProjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectError::Module { error, .. } => Some(error),
            ProjectError::Asset { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Loads a project from a root directory of module directories.
pub struct ProjectLoader;

impl ProjectLoader {
    pub fn load_blocking(root: impl AsRef<Path>) -> Result<ProjectLink, ProjectError> {
        Self::load_sync(root.as_ref())
    }

    fn load_sync(root: &Path) -> Result<ProjectLink, ProjectError> {
        if !root.is_dir() {
            return Err(ProjectError::MissingRoot(root.to_path_buf()));
        }

        let mut modules = Vec::new();
        let mut definitions = Vec::new();
        let mut bases = HashMap::new();

        let mut entries: Vec<PathBuf> = fs::read_dir(root)
            .map_err(|err| ProjectError::Module {
                path: root.to_path_buf(),
                error: ProjectIoError::Io {
                    path: root.to_path_buf(),
                    source: err,
                },
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        entries.sort();

        for module_dir in entries {
            let manifest_path = module_dir.join(MODULE_MANIFEST_NAME);
            if !manifest_path.exists() {
                continue;
            }

            let manifest: ModuleManifest =
                read_json_file(&manifest_path).map_err(|error| ProjectError::Module {
                    path: manifest_path.clone(),
                    error,
                })?;

            let module = ModuleDefinition {
                module_id: manifest.module_id,
                version_id: manifest.version_id,
                path: module_dir.clone(),
                declared_assets: manifest.declared_assets,
            };

            let mut seen_paths: HashSet<PathBuf> = HashSet::new();
            for relative in &module.declared_assets {
                if !seen_paths.insert(relative.clone()) {
                    warn!(
                        module = %module.module_id,
                        path = %relative.display(),
                        "duplicate declared asset entry, skipping"
                    );
                    continue;
                }

                let file_path = module.path.join(relative);
                if !file_path.exists() {
                    warn!(
                        module = %module.module_id,
                        path = %file_path.display(),
                        "declared asset file is missing, skipping"
                    );
                    continue;
                }

                let file: AssetDefinitionFile =
                    read_json_file(&file_path).map_err(|error| ProjectError::Asset {
                        path: file_path.clone(),
                        error,
                    })?;

                let asset_id = make_asset_id(&module.module_id, &file.asset_name);
                if bases.contains_key(&asset_id) {
                    warn!(
                        asset = %asset_id,
                        path = %file_path.display(),
                        "asset id already declared, skipping"
                    );
                    continue;
                }
                definitions.push(AssetDefinition {
                    asset_id: asset_id.clone(),
                    asset_type: file.asset_type.clone(),
                    module_id: module.module_id.clone(),
                    file_path: relative.clone(),
                });
                bases.insert(
                    asset_id.clone(),
                    AssetBase {
                        asset_id,
                        asset_type: file.asset_type,
                        fields: file.fields,
                    },
                );
            }

            modules.push(module);
        }

        info!(
            root = %root.display(),
            modules = modules.len(),
            assets = definitions.len(),
            "project loaded"
        );

        Ok(ProjectLink {
            root: root.to_path_buf(),
            modules,
            definitions,
            bases,
            dirty: HashSet::new(),
        })
    }
}

/// On-disk asset database: one directory per module under the project root,
/// each with a `module.json` manifest and the definition files it declares.
#[derive(Debug)]
pub struct ProjectLink {
    root: PathBuf,
    modules: Vec<ModuleDefinition>,
    definitions: Vec<AssetDefinition>,
    bases: HashMap<String, AssetBase>,
    dirty: HashSet<String>,
}

impl ProjectLink {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Writes every edited asset definition back to its file.
    pub fn save_blocking(&mut self) -> Result<(), ProjectError> {
        let mut ids: Vec<String> = self.dirty.iter().cloned().collect();
        ids.sort();

        for asset_id in ids {
            let Some(definition) = self
                .definitions
                .iter()
                .find(|def| def.asset_id == asset_id)
            else {
                continue;
            };
            let Some(base) = self.bases.get(&asset_id) else {
                continue;
            };
            let Some(module) = self
                .modules
                .iter()
                .find(|module| module.module_id == definition.module_id)
            else {
                continue;
            };

            let file_path = module.path.join(&definition.file_path);
            let file = AssetDefinitionFile {
                asset_name: asset_name_of(&asset_id),
                asset_type: base.asset_type.clone(),
                fields: base.fields.clone(),
            };
            write_json_file(&file_path, &file).map_err(|error| ProjectError::Asset {
                path: file_path.clone(),
                error,
            })?;
        }

        info!(root = %self.root.display(), saved = self.dirty.len(), "project saved");
        self.dirty.clear();
        Ok(())
    }

    fn write_manifest(&self, module: &ModuleDefinition) -> Result<(), ProjectError> {
        let manifest = ModuleManifest {
            module_id: module.module_id.clone(),
            version_id: module.version_id,
            declared_assets: module.declared_assets.clone(),
        };
        let manifest_path = module.path.join(MODULE_MANIFEST_NAME);
        write_json_file(&manifest_path, &manifest).map_err(|error| ProjectError::Module {
            path: manifest_path,
            error,
        })
    }
}

fn asset_name_of(asset_id: &str) -> String {
    crate::engine::assets::split_asset_id(asset_id)
        .1
        .unwrap_or(asset_id)
        .to_string()
}

impl AssetSource for ProjectLink {
    fn declared_assets(&self) -> &[AssetDefinition] {
        &self.definitions
    }

    fn asset_base(&self, asset_id: &str) -> Option<&AssetBase> {
        self.bases.get(asset_id)
    }

    fn set_asset_field(&mut self, asset_id: &str, field: &str, value: FieldValue) -> bool {
        let Some(base) = self.bases.get_mut(asset_id) else {
            return false;
        };
        base.fields.insert(field.to_string(), value);
        self.dirty.insert(asset_id.to_string());
        true
    }

    fn find_loaded_module(&self, module_id: &str) -> Option<&ModuleDefinition> {
        self.modules
            .iter()
            .find(|module| module.module_id == module_id)
    }

    fn create_asset(
        &mut self,
        module_id: &str,
        definition: AssetDefinitionFile,
        definition_path: &Path,
    ) -> Result<AssetDefinition, ProjectError> {
        let asset_id = make_asset_id(module_id, &definition.asset_name);
        if self.bases.contains_key(&asset_id) {
            return Err(ProjectError::DuplicateAsset { asset_id });
        }

        let module_index = self
            .modules
            .iter()
            .position(|module| module.module_id == module_id)
            .ok_or_else(|| ProjectError::UnknownModule {
                module_id: module_id.to_string(),
            })?;

        write_json_file(definition_path, &definition).map_err(|error| ProjectError::Asset {
            path: definition_path.to_path_buf(),
            error,
        })?;

        let relative = crate::engine::paths::make_relative_path(
            definition_path,
            &self.modules[module_index].path,
        );

        // Manifest goes to disk first; in-memory state only changes once the
        // write succeeded.
        let mut module = self.modules[module_index].clone();
        module.declared_assets.push(relative.clone());
        self.write_manifest(&module)?;
        self.modules[module_index] = module;

        let created = AssetDefinition {
            asset_id: asset_id.clone(),
            asset_type: definition.asset_type.clone(),
            module_id: module_id.to_string(),
            file_path: relative,
        };
        self.definitions.push(created.clone());
        self.bases.insert(
            asset_id.clone(),
            AssetBase {
                asset_id: asset_id.clone(),
                asset_type: definition.asset_type,
                fields: definition.fields,
            },
        );

        info!(asset = %asset_id, module = %module_id, "asset created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn write_module(root: &Path, module_id: &str, assets: &[(&str, &str)]) {
        let module_dir = root.join(module_id);
        fs::create_dir_all(&module_dir).unwrap();

        let mut declared = Vec::new();
        for (name, asset_type) in assets {
            let file = AssetDefinitionFile {
                asset_name: name.to_string(),
                asset_type: asset_type.to_string(),
                fields: BTreeMap::from([(
                    "AssetName".to_string(),
                    FieldValue::text(*name),
                )]),
            };
            let relative = PathBuf::from(format!("{name}.asset.json"));
            write_json_file(module_dir.join(&relative), &file).unwrap();
            declared.push(relative);
        }

        let manifest = ModuleManifest {
            module_id: module_id.to_string(),
            version_id: 1,
            declared_assets: declared,
        };
        write_json_file(module_dir.join(MODULE_MANIFEST_NAME), &manifest).unwrap();
    }

    #[test]
    fn loads_modules_and_declared_assets() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset"), ("dirt", "ImageAsset")]);
        write_module(tmp.path(), "props", &[("barrel", "MeshAsset")]);

        let link = ProjectLoader::load_blocking(tmp.path()).unwrap();

        assert_eq!(link.modules().len(), 2);
        assert_eq!(link.declared_assets().len(), 3);
        assert!(link.asset_base("base:rock").is_some());
        assert!(link.find_loaded_module("props").is_some());
        assert!(link.find_loaded_module("missing").is_none());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = ProjectLoader::load_blocking(tmp.path().join("nope"));
        assert!(matches!(result, Err(ProjectError::MissingRoot(_))));
    }

    #[test]
    fn missing_declared_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset")]);

        // Declare a second asset whose file never existed.
        let manifest_path = tmp.path().join("base").join(MODULE_MANIFEST_NAME);
        let mut manifest: ModuleManifest = read_json_file(&manifest_path).unwrap();
        manifest.declared_assets.push(PathBuf::from("ghost.asset.json"));
        write_json_file(&manifest_path, &manifest).unwrap();

        let link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert_eq!(link.declared_assets().len(), 1);
    }

    #[test]
    fn create_asset_persists_across_reload() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[]);

        let mut link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        let definition_path = tmp.path().join("base/meshes/rock.asset.json");
        let file = AssetDefinitionFile {
            asset_name: "rock".to_string(),
            asset_type: "MeshAsset".to_string(),
            fields: BTreeMap::from([(
                "MeshFile".to_string(),
                FieldValue::text("rock.obj"),
            )]),
        };
        let created = link.create_asset("base", file, &definition_path).unwrap();
        assert_eq!(created.asset_id, "base:rock");
        assert_eq!(created.file_path, PathBuf::from("meshes/rock.asset.json"));

        let reloaded = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert_eq!(reloaded.declared_assets().len(), 1);
        let base = reloaded.asset_base("base:rock").unwrap();
        assert_eq!(
            base.data_field("MeshFile"),
            Some(&FieldValue::text("rock.obj"))
        );
    }

    #[test]
    fn duplicate_asset_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset")]);

        let mut link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        let result = link.create_asset(
            "base",
            AssetDefinitionFile {
                asset_name: "rock".to_string(),
                asset_type: "MeshAsset".to_string(),
                fields: BTreeMap::new(),
            },
            &tmp.path().join("base/rock2.asset.json"),
        );
        assert!(matches!(result, Err(ProjectError::DuplicateAsset { .. })));
    }

    #[test]
    fn unknown_module_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[]);

        let mut link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        let result = link.create_asset(
            "missing",
            AssetDefinitionFile::default(),
            &tmp.path().join("missing/a.asset.json"),
        );
        assert!(matches!(result, Err(ProjectError::UnknownModule { .. })));
    }

    #[test]
    fn duplicate_manifest_entries_load_once() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset")]);

        let manifest_path = tmp.path().join("base").join(MODULE_MANIFEST_NAME);
        let mut manifest: ModuleManifest = read_json_file(&manifest_path).unwrap();
        let duplicate = manifest.declared_assets[0].clone();
        manifest.declared_assets.push(duplicate);
        write_json_file(&manifest_path, &manifest).unwrap();

        let link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert_eq!(link.declared_assets().len(), 1);

        let tree = crate::tree::AssetTree::build(&link);
        assert_eq!(tree.asset_count(), 1);
        assert_eq!(tree.modules[0].categories[0].assets.len(), 1);
    }

    #[test]
    fn colliding_asset_ids_load_once() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset")]);

        // A second definition file declaring the same asset name.
        let copy = AssetDefinitionFile {
            asset_name: "rock".to_string(),
            asset_type: "MeshAsset".to_string(),
            fields: BTreeMap::new(),
        };
        let module_dir = tmp.path().join("base");
        write_json_file(module_dir.join("rock_copy.asset.json"), &copy).unwrap();

        let manifest_path = module_dir.join(MODULE_MANIFEST_NAME);
        let mut manifest: ModuleManifest = read_json_file(&manifest_path).unwrap();
        manifest.declared_assets.push(PathBuf::from("rock_copy.asset.json"));
        write_json_file(&manifest_path, &manifest).unwrap();

        let link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert_eq!(link.declared_assets().len(), 1);
        assert_eq!(link.declared_assets()[0].file_path, PathBuf::from("rock.asset.json"));
    }

    #[test]
    fn failed_manifest_write_leaves_module_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[]);

        let mut link = ProjectLoader::load_blocking(tmp.path()).unwrap();

        // A directory where module.json lives makes the manifest unwritable.
        let manifest_path = tmp.path().join("base").join(MODULE_MANIFEST_NAME);
        fs::remove_file(&manifest_path).unwrap();
        fs::create_dir(&manifest_path).unwrap();

        let definition = AssetDefinitionFile {
            asset_name: "rock".to_string(),
            asset_type: "MeshAsset".to_string(),
            fields: BTreeMap::new(),
        };
        let definition_path = tmp.path().join("base/rock.asset.json");
        let result = link.create_asset("base", definition.clone(), &definition_path);
        assert!(matches!(result, Err(ProjectError::Module { .. })));

        assert!(link.find_loaded_module("base").unwrap().declared_assets.is_empty());
        assert!(link.asset_base("base:rock").is_none());
        assert!(link.declared_assets().is_empty());

        // A retry after the manifest becomes writable again declares the
        // asset exactly once.
        fs::remove_dir(&manifest_path).unwrap();
        link.create_asset("base", definition, &definition_path).unwrap();

        let manifest: ModuleManifest = read_json_file(&manifest_path).unwrap();
        assert_eq!(manifest.declared_assets, vec![PathBuf::from("rock.asset.json")]);
    }

    #[test]
    fn set_field_marks_dirty_and_save_writes_through() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "base", &[("rock", "MeshAsset")]);

        let mut link = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert!(!link.is_dirty());

        assert!(link.set_asset_field("base:rock", "Description", FieldValue::text("a rock")));
        assert!(link.is_dirty());
        assert!(!link.set_asset_field("base:ghost", "Description", FieldValue::text("x")));

        link.save_blocking().unwrap();
        assert!(!link.is_dirty());

        let reloaded = ProjectLoader::load_blocking(tmp.path()).unwrap();
        assert_eq!(
            reloaded.asset_base("base:rock").unwrap().data_field("Description"),
            Some(&FieldValue::text("a rock"))
        );
    }
}
