//! Unit selection and filesystem validation.
//!
//! Turns the manifest into the candidate set the scheduler works on. Three
//! filters run in order, each one only ever removing units:
//!
//! 1. **Workspace rules**: with `workspace.enable_all` a unit is selected
//!    unless listed in `workspace.disable`; otherwise only units listed in
//!    `workspace.enable` are. A unit's own `disabled: true` always wins.
//! 2. **Directory check**: the unit's source directory must exist.
//! 3. **File check**: every declared code file must exist in that directory.
//!
//! Units sharing an id are excluded as well; the manifest is ambiguous and
//! no unit can be picked over the others. So are units declared under the
//! `mediawiki` section, which belongs to interface code discovered on disk.
//!
//! None of this is fatal. Every removed unit is recorded as an [`Exclusion`]
//! and the rest of the build carries on.

use crate::manifest::GadgetsDefinition;
use crate::source::SourceTree;
use crate::types::{BuildUnit, INTERFACE_SECTION, UnitId};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Why a declared unit did not make it into the candidate set.
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// `disabled: true` on the gadget itself.
    Disabled { id: UnitId },
    /// Listed in `workspace.disable`, or absent from `workspace.enable`.
    NotEnabled { id: UnitId },
    /// Declared under the section reserved for interface code.
    ReservedSection { id: UnitId },
    /// More than one declaration resolves to this id.
    DuplicateId { id: UnitId, count: usize },
    MissingDirectory { id: UnitId, path: PathBuf },
    MissingFiles { id: UnitId, missing: Vec<String> },
}

impl Exclusion {
    pub fn id(&self) -> &UnitId {
        match self {
            Exclusion::Disabled { id }
            | Exclusion::NotEnabled { id }
            | Exclusion::ReservedSection { id }
            | Exclusion::DuplicateId { id, .. }
            | Exclusion::MissingDirectory { id, .. }
            | Exclusion::MissingFiles { id, .. } => id,
        }
    }
}

/// Validated candidates plus everything that was dropped on the way.
#[derive(Debug, Default)]
pub struct Selection {
    pub candidates: Vec<BuildUnit>,
    pub excluded: Vec<Exclusion>,
}

/// Run all selection filters over the manifest.
pub fn select_units(manifest: &GadgetsDefinition, tree: &dyn SourceTree) -> Selection {
    let mut excluded = Vec::new();

    let selected = apply_workspace_rules(manifest, &mut excluded);
    let gadgets = reject_reserved_section(selected, &mut excluded);
    let unique = reject_duplicate_ids(gadgets, &mut excluded);
    let present = prune_missing_directories(unique, tree, &mut excluded);
    let complete = prune_missing_files(present, tree, &mut excluded);

    Selection {
        candidates: complete,
        excluded,
    }
}

/// Apply `enable_all` / `enable` / `disable` and the per-unit `disabled` flag.
pub fn apply_workspace_rules(
    manifest: &GadgetsDefinition,
    excluded: &mut Vec<Exclusion>,
) -> Vec<BuildUnit> {
    let workspace = &manifest.workspace;
    let enabled: HashSet<&str> = workspace.enable.iter().map(String::as_str).collect();
    let disabled: HashSet<&str> = workspace.disable.iter().map(String::as_str).collect();

    let mut selected = Vec::new();
    for unit in manifest.units() {
        let id = unit.id();
        if unit.disabled {
            excluded.push(Exclusion::Disabled { id });
            continue;
        }
        let wanted = if workspace.enable_all {
            !disabled.contains(id.as_str())
        } else {
            enabled.contains(id.as_str())
        };
        if wanted {
            selected.push(unit);
        } else {
            excluded.push(Exclusion::NotEnabled { id });
        }
    }
    selected
}

fn reject_reserved_section(
    units: Vec<BuildUnit>,
    excluded: &mut Vec<Exclusion>,
) -> Vec<BuildUnit> {
    units
        .into_iter()
        .filter(|unit| {
            if unit.section != INTERFACE_SECTION {
                return true;
            }
            excluded.push(Exclusion::ReservedSection { id: unit.id() });
            false
        })
        .collect()
}

fn reject_duplicate_ids(units: Vec<BuildUnit>, excluded: &mut Vec<Exclusion>) -> Vec<BuildUnit> {
    let mut counts: HashMap<UnitId, usize> = HashMap::new();
    for unit in &units {
        *counts.entry(unit.id()).or_default() += 1;
    }

    let mut reported = HashSet::new();
    units
        .into_iter()
        .filter(|unit| {
            let id = unit.id();
            let count = counts[&id];
            if count == 1 {
                return true;
            }
            if reported.insert(id.clone()) {
                excluded.push(Exclusion::DuplicateId { id, count });
            }
            false
        })
        .collect()
}

/// Drop units whose source directory does not exist.
pub fn prune_missing_directories(
    units: Vec<BuildUnit>,
    tree: &dyn SourceTree,
    excluded: &mut Vec<Exclusion>,
) -> Vec<BuildUnit> {
    units
        .into_iter()
        .filter(|unit| {
            if tree.unit_exists(&unit.section, &unit.name) {
                return true;
            }
            excluded.push(Exclusion::MissingDirectory {
                id: unit.id(),
                path: tree.unit_dir(&unit.section, &unit.name),
            });
            false
        })
        .collect()
}

/// Drop units with any declared code file missing.
pub fn prune_missing_files(
    units: Vec<BuildUnit>,
    tree: &dyn SourceTree,
    excluded: &mut Vec<Exclusion>,
) -> Vec<BuildUnit> {
    units
        .into_iter()
        .filter(|unit| {
            let missing: Vec<String> = unit
                .code
                .iter()
                .filter(|file| !tree.file_exists(&unit.section, &unit.name, file))
                .cloned()
                .collect();
            if missing.is_empty() {
                return true;
            }
            excluded.push(Exclusion::MissingFiles {
                id: unit.id(),
                missing,
            });
            false
        })
        .collect()
}
