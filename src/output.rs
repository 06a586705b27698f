//! CLI output formatting for all build stages.
//!
//! # Unit-First Display
//!
//! Every line leads with the unit's id (`section/name`). Paths, missing
//! files and unmet requirements follow as indented context lines, so the
//! output reads as an inventory of gadgets rather than of files.
//!
//! # Batched Diagnostics
//!
//! Problems found during selection and scheduling are never reported one at
//! a time. Each category is a single block listing every affected unit, so
//! one run shows everything that needs fixing.
//!
//! # Output Format
//!
//! ## Selection
//!
//! ```text
//! Excluded: disabled (1)
//!     core/Legacy
//! Excluded: code files missing (1)
//!     core/forum
//!         Missing: forum.less
//! ```
//!
//! ## Scheduling
//!
//! ```text
//! Interface code
//!     common
//!     vector (skins: vector)
//! Layer 1
//!     001 core/ModalBuilder
//! Layer 2
//!     002 core/forum
//!         Requires: core/ModalBuilder
//!
//! Scheduled 2 gadgets in 2 layers
//!
//! Unresolved (1)
//!     core/Y
//!         Waiting on: core/Z
//! ```
//!
//! ## Emission
//!
//! ```text
//!     core/ModalBuilder
//!     core/forum skipped: Cannot resolve gadget core/forum
//! Wrote 1 unit to dist/load.js (1 skipped)
//! ```
//!
//! # Architecture
//!
//! Each block has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper. Format functions are pure: no I/O,
//! no side effects. Diagnostics go to stderr, summaries to stdout.

use crate::emit::{EmitEvent, EmitReport};
use crate::schedule::{Schedule, Unresolved};
use crate::select::Exclusion;
use crate::types::BuildUnit;
use std::path::Path;

/// Format a 1-based load position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Selection output
// ============================================================================

/// Exclusion categories in display order.
const EXCLUSION_CATEGORIES: &[&str] = &[
    "disabled",
    "not enabled in workspace",
    "reserved section",
    "duplicate id",
    "source directory missing",
    "code files missing",
];

fn exclusion_category(exclusion: &Exclusion) -> &'static str {
    match exclusion {
        Exclusion::Disabled { .. } => EXCLUSION_CATEGORIES[0],
        Exclusion::NotEnabled { .. } => EXCLUSION_CATEGORIES[1],
        Exclusion::ReservedSection { .. } => EXCLUSION_CATEGORIES[2],
        Exclusion::DuplicateId { .. } => EXCLUSION_CATEGORIES[3],
        Exclusion::MissingDirectory { .. } => EXCLUSION_CATEGORIES[4],
        Exclusion::MissingFiles { .. } => EXCLUSION_CATEGORIES[5],
    }
}

/// One block per exclusion category, each listing every affected unit.
pub fn format_exclusions(excluded: &[Exclusion]) -> Vec<String> {
    let mut lines = Vec::new();
    for category in EXCLUSION_CATEGORIES {
        let batch: Vec<&Exclusion> = excluded
            .iter()
            .filter(|e| exclusion_category(e) == *category)
            .collect();
        if batch.is_empty() {
            continue;
        }
        lines.push(format!("Excluded: {} ({})", category, batch.len()));
        for exclusion in batch {
            match exclusion {
                Exclusion::DuplicateId { id, count } => {
                    lines.push(format!("{}{} (declared {} times)", indent(1), id, count));
                }
                Exclusion::MissingDirectory { id, path } => {
                    lines.push(format!("{}{}", indent(1), id));
                    lines.push(format!("{}Path: {}", indent(2), path.display()));
                }
                Exclusion::MissingFiles { id, missing } => {
                    lines.push(format!("{}{}", indent(1), id));
                    lines.push(format!("{}Missing: {}", indent(2), missing.join(", ")));
                }
                Exclusion::Disabled { id }
                | Exclusion::NotEnabled { id }
                | Exclusion::ReservedSection { id } => {
                    lines.push(format!("{}{}", indent(1), id));
                }
            }
        }
    }
    lines
}

pub fn print_exclusions(excluded: &[Exclusion]) {
    for line in format_exclusions(excluded) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Scheduling output
// ============================================================================

/// Interface units, then the schedule layer by layer with load positions.
pub fn format_schedule(schedule: &Schedule, interface: &[BuildUnit]) -> Vec<String> {
    let mut lines = Vec::new();

    if !interface.is_empty() {
        lines.push("Interface code".to_string());
        for unit in interface {
            let skins = unit
                .conditions
                .as_ref()
                .and_then(|c| c.skins.as_ref())
                .map(|s| format!(" (skins: {})", s.join(", ")))
                .unwrap_or_default();
            lines.push(format!("{}{}{}", indent(1), unit.name, skins));
        }
    }

    let mut position = 0;
    for (layer, units) in schedule.layers().iter().enumerate() {
        lines.push(format!("Layer {}", layer + 1));
        for unit in units.iter() {
            position += 1;
            lines.push(format!("{}{} {}", indent(1), format_index(position), unit.id()));
            if !unit.requires.is_empty() {
                lines.push(format!("{}Requires: {}", indent(2), unit.requires.join(", ")));
            }
        }
    }
    lines
}

/// One block listing every unit the scheduler could not place.
pub fn format_unresolved(unresolved: &[Unresolved]) -> Vec<String> {
    if unresolved.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("Unresolved ({})", unresolved.len())];
    for entry in unresolved {
        lines.push(format!("{}{}", indent(1), entry.unit.id()));
        lines.push(format!("{}Waiting on: {}", indent(2), entry.missing.join(", ")));
    }
    lines
}

pub fn format_schedule_summary(schedule: &Schedule) -> String {
    format!(
        "Scheduled {} in {}",
        plural(schedule.len(), "gadget"),
        plural(schedule.layers().len(), "layer")
    )
}

pub fn print_schedule(schedule: &Schedule, interface: &[BuildUnit]) {
    for line in format_schedule(schedule, interface) {
        println!("{}", line);
    }
    println!();
    println!("{}", format_schedule_summary(schedule));
}

// ============================================================================
// Emission output
// ============================================================================

pub fn format_emit_event(event: &EmitEvent) -> String {
    match event {
        EmitEvent::Written { id } => format!("{}{}", indent(1), id),
        EmitEvent::Skipped { id, reason } => {
            format!("{}{} skipped: {}", indent(1), id, reason)
        }
    }
}

pub fn print_emit_event(event: &EmitEvent) {
    match event {
        EmitEvent::Written { .. } => println!("{}", format_emit_event(event)),
        EmitEvent::Skipped { .. } => eprintln!("{}", format_emit_event(event)),
    }
}

pub fn print_unresolved(unresolved: &[Unresolved]) {
    for line in format_unresolved(unresolved) {
        eprintln!("{}", line);
    }
}

pub fn format_emit_summary(report: &EmitReport, target: &Path) -> String {
    let mut line = format!(
        "Wrote {} to {}",
        plural(report.written.len(), "unit"),
        target.display()
    );
    if !report.skipped.is_empty() {
        line.push_str(&format!(" ({} skipped)", report.skipped.len()));
    }
    line
}

pub fn print_emit_summary(report: &EmitReport, target: &Path) {
    println!("{}", format_emit_summary(report, target));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadError;
    use crate::schedule::resolve;
    use crate::test_helpers::{unit, unit_requiring};
    use crate::types::{Conditions, INTERFACE_SECTION, UnitId};
    use std::path::PathBuf;

    fn id(s: &str) -> UnitId {
        let (section, name) = s.split_once('/').unwrap();
        UnitId::new(section, name)
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "unit"), "1 unit");
        assert_eq!(plural(0, "unit"), "0 units");
    }

    #[test]
    fn exclusions_batched_by_category() {
        let excluded = vec![
            Exclusion::MissingFiles {
                id: id("core/forum"),
                missing: vec!["forum.less".into(), "x.ts".into()],
            },
            Exclusion::Disabled { id: id("core/a") },
            Exclusion::Disabled { id: id("core/b") },
            Exclusion::MissingDirectory {
                id: id("core/gone"),
                path: PathBuf::from("src/gadgets/core/gone"),
            },
            Exclusion::DuplicateId {
                id: id("core/dup"),
                count: 2,
            },
            Exclusion::ReservedSection {
                id: id("mediawiki/tool"),
            },
        ];
        assert_eq!(
            format_exclusions(&excluded),
            vec![
                "Excluded: disabled (2)",
                "    core/a",
                "    core/b",
                "Excluded: reserved section (1)",
                "    mediawiki/tool",
                "Excluded: duplicate id (1)",
                "    core/dup (declared 2 times)",
                "Excluded: source directory missing (1)",
                "    core/gone",
                "        Path: src/gadgets/core/gone",
                "Excluded: code files missing (1)",
                "    core/forum",
                "        Missing: forum.less, x.ts",
            ]
        );
    }

    #[test]
    fn no_exclusions_no_output() {
        assert!(format_exclusions(&[]).is_empty());
    }

    #[test]
    fn schedule_by_layer() {
        let resolution = resolve(vec![
            unit_requiring("core", "forum", &["core/ModalBuilder"]),
            unit("core", "ModalBuilder"),
        ]);
        let mut vector = unit(INTERFACE_SECTION, "vector");
        vector.conditions = Some(Conditions {
            skins: Some(vec!["vector".into()]),
            ..Default::default()
        });
        let interface = vec![unit(INTERFACE_SECTION, "common"), vector];

        assert_eq!(
            format_schedule(&resolution.schedule, &interface),
            vec![
                "Interface code",
                "    common",
                "    vector (skins: vector)",
                "Layer 1",
                "    001 core/ModalBuilder",
                "Layer 2",
                "    002 core/forum",
                "        Requires: core/ModalBuilder",
            ]
        );
        assert_eq!(
            format_schedule_summary(&resolution.schedule),
            "Scheduled 2 gadgets in 2 layers"
        );
    }

    #[test]
    fn unresolved_lists_missing_requirements() {
        let resolution = resolve(vec![
            unit("core", "a"),
            unit_requiring("core", "Y", &["core/Z"]),
        ]);
        assert_eq!(
            format_unresolved(&resolution.unresolved),
            vec!["Unresolved (1)", "    core/Y", "        Waiting on: core/Z"]
        );
        assert!(format_unresolved(&[]).is_empty());
    }

    #[test]
    fn emit_events() {
        assert_eq!(
            format_emit_event(&EmitEvent::Written { id: id("core/a") }),
            "    core/a"
        );
        let skipped = EmitEvent::Skipped {
            id: id("core/b"),
            reason: PayloadError::Unresolved(id("core/b")),
        };
        assert_eq!(
            format_emit_event(&skipped),
            "    core/b skipped: Cannot resolve gadget core/b"
        );
    }

    #[test]
    fn emit_summary() {
        let mut report = EmitReport::default();
        report.written.push(id("core/a"));
        assert_eq!(
            format_emit_summary(&report, Path::new("dist/load.js")),
            "Wrote 1 unit to dist/load.js"
        );
        report.skipped.push((id("core/b"), "gone".into()));
        assert_eq!(
            format_emit_summary(&report, Path::new("dist/load.js")),
            "Wrote 1 unit to dist/load.js (1 skipped)"
        );
    }
}
