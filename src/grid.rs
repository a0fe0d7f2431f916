//! Builds the rows of the property grid from an asset's declared field list
//! and stored values.

use crate::engine::fields::{AssetBase, FieldKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyRow {
    /// Group header.
    Category(String),
    Bool { name: String, value: bool },
    Text { name: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGrid {
    pub rows: Vec<PropertyRow>,
}

impl PropertyGrid {
    /// Walks the field list in declaration order. Deprecated fields and group
    /// terminators are skipped; a group header is only emitted once a field in
    /// the group actually has a stored value, so empty groups never show up.
    pub fn from_asset(asset: &AssetBase) -> Self {
        let mut rows = Vec::new();
        let mut pending_group: Option<&str> = None;

        for descriptor in asset.field_list() {
            match descriptor.kind {
                FieldKind::Deprecated | FieldKind::EndGroup => continue,
                FieldKind::StartGroup => {
                    pending_group = Some(descriptor.name);
                    continue;
                }
                FieldKind::Bool | FieldKind::Text => {}
            }

            let Some(value) = asset.data_field(descriptor.name) else {
                continue;
            };

            if let Some(group) = pending_group.take() {
                rows.push(PropertyRow::Category(group.to_string()));
            }

            match descriptor.kind {
                FieldKind::Bool => rows.push(PropertyRow::Bool {
                    name: descriptor.name.to_string(),
                    value: value.as_bool().unwrap_or_else(|| {
                        matches!(value.to_string().as_str(), "true" | "1")
                    }),
                }),
                _ => rows.push(PropertyRow::Text {
                    name: descriptor.name.to_string(),
                    value: value.to_string(),
                }),
            }
        }

        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fields::FieldValue;

    fn mesh_asset(fields: &[(&str, FieldValue)]) -> AssetBase {
        AssetBase {
            asset_id: "base:rock".to_string(),
            asset_type: "MeshAsset".to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    #[test]
    fn groups_are_emitted_before_their_first_valued_field() {
        let asset = mesh_asset(&[
            ("AssetName", FieldValue::text("rock")),
            ("MeshFile", FieldValue::text("rock.obj")),
        ]);
        let grid = PropertyGrid::from_asset(&asset);

        assert_eq!(
            grid.rows,
            vec![
                PropertyRow::Category("Asset".to_string()),
                PropertyRow::Text {
                    name: "AssetName".to_string(),
                    value: "rock".to_string(),
                },
                PropertyRow::Category("Geometry".to_string()),
                PropertyRow::Text {
                    name: "MeshFile".to_string(),
                    value: "rock.obj".to_string(),
                },
            ]
        );
    }

    #[test]
    fn group_without_values_is_omitted() {
        let asset = mesh_asset(&[("AssetName", FieldValue::text("rock"))]);
        let grid = PropertyGrid::from_asset(&asset);
        assert!(
            !grid
                .rows
                .iter()
                .any(|row| *row == PropertyRow::Category("Geometry".to_string()))
        );
    }

    #[test]
    fn deprecated_fields_are_never_shown() {
        // MeshFilePath is declared deprecated in the MeshAsset schema.
        let asset = mesh_asset(&[("MeshFilePath", FieldValue::text("old/rock.obj"))]);
        let grid = PropertyGrid::from_asset(&asset);
        assert!(grid.is_empty());
    }

    #[test]
    fn bool_fields_render_as_bool_rows() {
        let asset = mesh_asset(&[
            ("AutoUnload", FieldValue::Bool(true)),
            ("IsAnimated", FieldValue::text("true")),
        ]);
        let grid = PropertyGrid::from_asset(&asset);

        assert!(grid.rows.contains(&PropertyRow::Bool {
            name: "AutoUnload".to_string(),
            value: true,
        }));
        assert!(grid.rows.contains(&PropertyRow::Bool {
            name: "IsAnimated".to_string(),
            value: true,
        }));
    }

    #[test]
    fn empty_asset_yields_empty_grid() {
        let asset = mesh_asset(&[]);
        assert!(PropertyGrid::from_asset(&asset).is_empty());
    }
}
