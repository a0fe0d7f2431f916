//! Groups the flat list of declared assets into the three-level hierarchy the
//! panels display: module, asset category, asset.
//!
//! The grouping is transient. It is rebuilt from scratch on every refresh and
//! never updated incrementally; the working set is editor-authored content, so
//! the linear scans here are fine.

use crate::engine::{
    AssetDefinition, AssetSource,
    assets::{category_label, split_asset_id},
};

/// One asset entry under a category node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLeaf {
    pub asset_id: String,
    /// Portion of the identifier after the module prefix; the full identifier
    /// when the delimiter is absent.
    pub name: String,
}

/// Assets of one type within one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    /// Raw asset-type tag, e.g. `"MeshAsset"`.
    pub type_tag: String,
    /// Display label for the tag.
    pub label: String,
    pub assets: Vec<AssetLeaf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    pub module_id: String,
    pub version: u32,
    pub categories: Vec<CategoryNode>,
}

/// The display hierarchy. Module, category, and asset order is pure insertion
/// order, i.e. the order the input list was iterated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTree {
    pub modules: Vec<ModuleNode>,
}

impl AssetTree {
    /// Builds the tree from an asset source, filling in module versions from
    /// the loaded module definitions.
    pub fn build(source: &dyn AssetSource) -> Self {
        let mut tree = Self::from_definitions(source.declared_assets());
        for module in &mut tree.modules {
            if let Some(loaded) = source.find_loaded_module(&module.module_id) {
                module.version = loaded.version_id;
            }
        }
        tree
    }

    /// Groups asset definitions by (owning module, type tag).
    pub fn from_definitions<'a>(definitions: impl IntoIterator<Item = &'a AssetDefinition>) -> Self {
        let mut modules: Vec<ModuleNode> = Vec::new();

        for definition in definitions {
            let (_, asset_name) = split_asset_id(&definition.asset_id);
            let leaf = AssetLeaf {
                asset_id: definition.asset_id.clone(),
                name: asset_name.unwrap_or(&definition.asset_id).to_string(),
            };

            let module_index = match modules
                .iter()
                .position(|module| module.module_id == definition.module_id)
            {
                Some(index) => index,
                None => {
                    modules.push(ModuleNode {
                        module_id: definition.module_id.clone(),
                        version: 0,
                        categories: Vec::new(),
                    });
                    modules.len() - 1
                }
            };

            let module = &mut modules[module_index];
            match module
                .categories
                .iter()
                .position(|category| category.type_tag == definition.asset_type)
            {
                Some(index) => module.categories[index].assets.push(leaf),
                None => module.categories.push(CategoryNode {
                    type_tag: definition.asset_type.clone(),
                    label: category_label(&definition.asset_type).to_string(),
                    assets: vec![leaf],
                }),
            }
        }

        Self { modules }
    }

    /// Restricts the tree to one asset type, dropping modules without a
    /// matching category. Used by the Materials Tool.
    pub fn filtered_by_type(&self, type_tag: &str) -> Self {
        let modules = self
            .modules
            .iter()
            .filter_map(|module| {
                let categories: Vec<CategoryNode> = module
                    .categories
                    .iter()
                    .filter(|category| category.type_tag == type_tag)
                    .cloned()
                    .collect();
                if categories.is_empty() {
                    return None;
                }
                Some(ModuleNode {
                    module_id: module.module_id.clone(),
                    version: module.version,
                    categories,
                })
            })
            .collect();
        Self { modules }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn asset_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|module| &module.categories)
            .map(|category| category.assets.len())
            .sum()
    }
}

/// Tagged payload attached to a selected display node, in place of runtime
/// type tests on widget item data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module {
        module_id: String,
    },
    Category {
        module_id: String,
        type_tag: String,
    },
    Asset {
        asset_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
    use std::path::PathBuf;

    fn definition(module: &str, name: &str, asset_type: &str) -> AssetDefinition {
        AssetDefinition {
            asset_id: format!("{module}:{name}"),
            asset_type: asset_type.to_string(),
            module_id: module.to_string(),
            file_path: PathBuf::from(format!("{name}.asset.json")),
        }
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        let tree = AssetTree::from_definitions(std::iter::empty::<&AssetDefinition>());
        assert!(tree.is_empty());
        assert_eq!(tree.asset_count(), 0);
    }

    #[test]
    fn groups_by_module_then_category() {
        let defs = vec![
            definition("base", "rock", "MeshAsset"),
            definition("base", "dirt", "ImageAsset"),
            definition("props", "barrel", "MeshAsset"),
            definition("base", "boulder", "MeshAsset"),
        ];
        let tree = AssetTree::from_definitions(&defs);

        assert_eq!(tree.modules.len(), 2);
        let base = &tree.modules[0];
        assert_eq!(base.module_id, "base");
        assert_eq!(base.categories.len(), 2);
        assert_eq!(base.categories[0].label, "Meshes");
        assert_eq!(base.categories[0].assets.len(), 2);
        assert_eq!(base.categories[0].assets[1].name, "boulder");
        assert_eq!(base.categories[1].label, "Images");

        let props = &tree.modules[1];
        assert_eq!(props.categories.len(), 1);
        assert_eq!(props.categories[0].assets[0].asset_id, "props:barrel");
    }

    #[test]
    fn shared_module_and_type_never_duplicates_categories() {
        let defs = vec![
            definition("base", "a", "MeshAsset"),
            definition("base", "b", "MeshAsset"),
            definition("base", "c", "MeshAsset"),
        ];
        let tree = AssetTree::from_definitions(&defs);
        assert_eq!(tree.modules.len(), 1);
        assert_eq!(tree.modules[0].categories.len(), 1);
        assert_eq!(tree.modules[0].categories[0].assets.len(), 3);
    }

    #[test]
    fn unknown_type_tag_passes_through_as_label() {
        let defs = vec![definition("base", "hill", "TerrainAsset")];
        let tree = AssetTree::from_definitions(&defs);
        assert_eq!(tree.modules[0].categories[0].label, "TerrainAsset");
        assert_eq!(tree.modules[0].categories[0].type_tag, "TerrainAsset");
    }

    #[test]
    fn identifier_without_delimiter_keeps_full_id_as_name() {
        let def = AssetDefinition {
            asset_id: "orphan".to_string(),
            asset_type: "MeshAsset".to_string(),
            module_id: "base".to_string(),
            file_path: PathBuf::from("orphan.asset.json"),
        };
        let tree = AssetTree::from_definitions([&def]);
        assert_eq!(tree.modules[0].categories[0].assets[0].name, "orphan");
    }

    #[test]
    fn rebuild_from_same_input_is_identical() {
        let defs = vec![
            definition("props", "barrel", "MeshAsset"),
            definition("base", "rock", "MeshAsset"),
            definition("base", "dirt", "ImageAsset"),
        ];
        let first = AssetTree::from_definitions(&defs);
        let second = AssetTree::from_definitions(&defs);
        assert_eq!(first, second);
    }

    #[test]
    fn every_definition_lands_in_exactly_one_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let modules = ["base", "props", "levels", "fx"];
        let types = ["MeshAsset", "ImageAsset", "MaterialAsset", "CustomAsset"];

        let mut defs = Vec::new();
        for index in 0..200 {
            let module = modules[rng.gen_range(0..modules.len())];
            let asset_type = types[rng.gen_range(0..types.len())];
            defs.push(definition(module, &format!("asset{index}"), asset_type));
        }
        defs.shuffle(&mut rng);

        let tree = AssetTree::from_definitions(&defs);
        assert_eq!(tree.asset_count(), defs.len());

        // Each definition occurs exactly once, under its own module and type.
        for def in &defs {
            let placements: Vec<_> = tree
                .modules
                .iter()
                .flat_map(|module| {
                    module.categories.iter().map(move |category| (module, category))
                })
                .flat_map(|(module, category)| {
                    category
                        .assets
                        .iter()
                        .filter(|leaf| leaf.asset_id == def.asset_id)
                        .map(move |_| (module.module_id.clone(), category.type_tag.clone()))
                })
                .collect();
            assert_eq!(placements, vec![(def.module_id.clone(), def.asset_type.clone())]);
        }
    }

    #[test]
    fn filter_by_type_keeps_only_matching_categories() {
        let defs = vec![
            definition("base", "rock", "MeshAsset"),
            definition("base", "stone", "MaterialAsset"),
            definition("props", "barrel", "MeshAsset"),
        ];
        let tree = AssetTree::from_definitions(&defs).filtered_by_type("MaterialAsset");
        assert_eq!(tree.modules.len(), 1);
        assert_eq!(tree.modules[0].module_id, "base");
        assert_eq!(tree.modules[0].categories[0].assets[0].name, "stone");
    }
}
