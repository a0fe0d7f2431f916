use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A single field value stored in an asset definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// How a field descriptor participates in the introspection walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Opens a display group; `name` is the group label.
    StartGroup,
    /// Closes the current display group.
    EndGroup,
    /// Retired field, skipped entirely.
    Deprecated,
    Bool,
    Text,
}

/// One entry of an asset type's field list, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    const fn group(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::StartGroup,
        }
    }

    const fn end_group() -> Self {
        Self {
            name: "",
            kind: FieldKind::EndGroup,
        }
    }

    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Bool,
        }
    }

    const fn deprecated(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Deprecated,
        }
    }
}

const ASSET_GROUP: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
];

const MESH_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
    FieldDescriptor::group("Geometry"),
    FieldDescriptor::text("MeshFile"),
    FieldDescriptor::deprecated("MeshFilePath"),
    FieldDescriptor::boolean("IsAnimated"),
    FieldDescriptor::end_group(),
];

const IMAGE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
    FieldDescriptor::group("Image"),
    FieldDescriptor::text("ImageFile"),
    FieldDescriptor::text("FilterMode"),
    FieldDescriptor::end_group(),
];

const MATERIAL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
    FieldDescriptor::group("Material"),
    FieldDescriptor::text("TemplateFile"),
    FieldDescriptor::text("Texture0"),
    FieldDescriptor::text("Texture1"),
    FieldDescriptor::end_group(),
];

const SHADER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
    FieldDescriptor::group("Shader"),
    FieldDescriptor::text("VertexShaderFile"),
    FieldDescriptor::text("PixelShaderFile"),
    FieldDescriptor::end_group(),
];

const ENTITY_TEMPLATE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::group("Asset"),
    FieldDescriptor::text("AssetName"),
    FieldDescriptor::text("Description"),
    FieldDescriptor::boolean("AutoUnload"),
    FieldDescriptor::end_group(),
    FieldDescriptor::group("Template"),
    FieldDescriptor::text("TemplateFile"),
    FieldDescriptor::end_group(),
];

/// Returns the declared field list for an asset type.
///
/// Unknown types fall back to the common asset group so every asset can still
/// be inspected.
pub fn field_schema(asset_type: &str) -> &'static [FieldDescriptor] {
    match asset_type {
        "MeshAsset" => MESH_FIELDS,
        "ImageAsset" => IMAGE_FIELDS,
        "MaterialAsset" => MATERIAL_FIELDS,
        "ShaderAsset" => SHADER_FIELDS,
        "EntityTemplateAsset" => ENTITY_TEMPLATE_FIELDS,
        _ => ASSET_GROUP,
    }
}

/// A loaded asset with its stored field values, the unit of introspection.
#[derive(Debug, Clone)]
pub struct AssetBase {
    pub asset_id: String,
    pub asset_type: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl AssetBase {
    pub fn field_list(&self) -> &'static [FieldDescriptor] {
        field_schema(&self.asset_type)
    }

    pub fn data_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
