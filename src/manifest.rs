//! The gadgets definition manifest (`gadgets-definition.yaml`).
//!
//! ```yaml
//! workspace:
//!   enable_all: true
//!   disable:
//!     - contents/spoiler
//!
//! gadgets:
//!   core:
//!     AddCategory:
//!       description: "Add Category script."
//!       code:
//!         - add-category.ts
//!       requires:
//!         - core/ModalBuilder
//!       resourceLoader:
//!         default: true
//!         actions:
//!           - view
//!         namespaces: "0,4,6,14"
//! ```
//!
//! List-like `resourceLoader` fields accept a comma-delimited string, a
//! single number or a YAML sequence; [`ListValue::normalize`] turns all three
//! into a `Vec<String>`.
//!
//! Section and gadget order is preserved: it is the tie-break for units that
//! become loadable in the same dependency layer.

use crate::types::{BuildUnit, Conditions, LoaderFlags};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Root of the manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GadgetsDefinition {
    pub workspace: Workspace,
    /// `section → gadget name → definition`. Empty sections and empty
    /// gadget entries are tolerated.
    pub gadgets: IndexMap<String, Option<IndexMap<String, Option<GadgetDefinition>>>>,
}

/// Workspace-level selection rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub enable_all: bool,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GadgetDefinition {
    pub description: Option<String>,
    pub code: Vec<String>,
    pub i18n: Vec<String>,
    pub requires: Option<ListValue>,
    pub disabled: bool,
    #[serde(rename = "resourceLoader")]
    pub resource_loader: Option<ResourceLoaderDefinition>,
}

/// The `resourceLoader` block of a gadget.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceLoaderDefinition {
    pub default: bool,
    pub hidden: bool,
    pub package: bool,
    pub supports_url_load: bool,
    #[serde(rename = "type")]
    pub module_type: Option<String>,
    pub peers: Option<ListValue>,
    pub dependencies: Option<ListValue>,
    pub rights: Option<ListValue>,
    pub skins: Option<ListValue>,
    pub actions: Option<ListValue>,
    pub categories: Option<ListValue>,
    pub namespaces: Option<ListValue>,
    pub content_models: Option<ListValue>,
}

/// A list field written either as `"a, b"`, as a bare scalar, or as a sequence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Single(Scalar),
    Items(Vec<Scalar>),
}

/// Any YAML scalar. Non-string values are kept as their YAML spelling so a
/// stray `1.5` or `true` in one gadget does not reject the whole manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    fn items(&self) -> Vec<String> {
        match self {
            Scalar::Number(n) => vec![n.to_string()],
            Scalar::Float(f) => vec![f.to_string()],
            Scalar::Bool(b) => vec![b.to_string()],
            Scalar::Text(s) => split_delimited(s),
        }
    }
}

impl ListValue {
    /// Flatten into trimmed, non-empty strings.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            ListValue::Single(scalar) => scalar.items(),
            ListValue::Items(items) => items.iter().flat_map(Scalar::items).collect(),
        }
    }
}

fn split_delimited(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize an optional list field. An explicitly empty list counts as unset.
fn normalized(value: &Option<ListValue>) -> Option<Vec<String>> {
    value
        .as_ref()
        .map(ListValue::normalize)
        .filter(|items| !items.is_empty())
}

impl ResourceLoaderDefinition {
    pub fn conditions(&self) -> Conditions {
        Conditions {
            rights: normalized(&self.rights),
            skins: normalized(&self.skins),
            actions: normalized(&self.actions),
            categories: normalized(&self.categories),
            namespaces: normalized(&self.namespaces),
            content_models: normalized(&self.content_models),
            dependencies: normalized(&self.dependencies),
        }
    }

    pub fn flags(&self) -> LoaderFlags {
        LoaderFlags {
            default: self.default,
            hidden: self.hidden,
            package: self.package,
            supports_url_load: self.supports_url_load,
            module_type: self.module_type.clone(),
            peers: normalized(&self.peers).unwrap_or_default(),
        }
    }
}

impl GadgetDefinition {
    /// Attach the owning section and name, producing a flat build unit.
    pub fn to_unit(&self, section: &str, name: &str) -> BuildUnit {
        let conditions = self
            .resource_loader
            .as_ref()
            .map(ResourceLoaderDefinition::conditions)
            .filter(|c| !c.is_empty());
        let flags = self
            .resource_loader
            .as_ref()
            .map(ResourceLoaderDefinition::flags)
            .unwrap_or_default();
        BuildUnit {
            section: section.to_string(),
            name: name.to_string(),
            description: self.description.clone(),
            code: self.code.clone(),
            i18n: self.i18n.clone(),
            requires: normalized(&self.requires).unwrap_or_default(),
            disabled: self.disabled,
            conditions,
            flags,
        }
    }
}

impl GadgetsDefinition {
    /// Every declared gadget as a build unit, in declaration order.
    pub fn units(&self) -> Vec<BuildUnit> {
        let mut units = Vec::new();
        for (section, gadgets) in &self.gadgets {
            let Some(gadgets) = gadgets else { continue };
            for (name, definition) in gadgets {
                let unit = match definition {
                    Some(def) => def.to_unit(section, name),
                    None => GadgetDefinition::default().to_unit(section, name),
                };
                units.push(unit);
            }
        }
        units
    }
}

pub fn parse_manifest(content: &str) -> Result<GadgetsDefinition, serde_yaml::Error> {
    // An empty document deserializes to unit, not to a mapping.
    if content.trim().is_empty() {
        return Ok(GadgetsDefinition::default());
    }
    serde_yaml::from_str(content)
}

pub fn load_manifest(path: &Path) -> Result<GadgetsDefinition, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content).map_err(|source| ManifestError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
