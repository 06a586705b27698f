//! Shared types used across all build stages.
//!
//! The manifest is parsed into loosely-typed declarations
//! ([`crate::manifest`]); selection flattens those into [`BuildUnit`]s, which
//! are what the scheduler, guard synthesizer, payload compiler and emitter
//! operate on.

use crate::naming::{FileKind, file_kind};
use serde::Serialize;
use std::fmt;

/// Section name reserved for the wiki's global interface code
/// (`MediaWiki:Common.js`, `MediaWiki:Vector.css`, ...).
pub const INTERFACE_SECTION: &str = "mediawiki";

/// Globally unique identity of a unit: `section/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(section: &str, name: &str) -> Self {
        Self(format!("{section}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runtime applicability rules, normalized from the manifest's
/// `resourceLoader` block. `None` means the rule is not set.
///
/// Values are kept as strings; namespaces are rendered unquoted when they
/// parse as integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conditions {
    pub rights: Option<Vec<String>>,
    pub skins: Option<Vec<String>>,
    pub actions: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub namespaces: Option<Vec<String>>,
    pub content_models: Option<Vec<String>>,
    /// Extra ResourceLoader modules to wait for before running the gadget.
    pub dependencies: Option<Vec<String>>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        [
            &self.rights,
            &self.skins,
            &self.actions,
            &self.categories,
            &self.namespaces,
            &self.content_models,
            &self.dependencies,
        ]
        .iter()
        .all(|v| v.is_none())
    }
}

/// Gadget flags that only matter for `MediaWiki:Gadgets-definition`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoaderFlags {
    pub default: bool,
    pub hidden: bool,
    pub package: bool,
    pub supports_url_load: bool,
    pub module_type: Option<String>,
    pub peers: Vec<String>,
}

/// One buildable item: a gadget or a group of interface code files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildUnit {
    pub section: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Code files in declaration order, scripts and stylesheets mixed.
    pub code: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub i18n: Vec<String>,
    /// Unit ids that must be loaded before this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    #[serde(skip)]
    pub flags: LoaderFlags,
}

impl BuildUnit {
    pub fn id(&self) -> UnitId {
        UnitId::new(&self.section, &self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.section == INTERFACE_SECTION
    }

    /// Script files, in declaration order.
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.files_of(FileKind::Script)
    }

    /// Stylesheet files, in declaration order.
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.files_of(FileKind::Style)
    }

    fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &str> {
        self.code
            .iter()
            .map(String::as_str)
            .filter(move |f| file_kind(f) == kind)
    }
}
