//! Shared test utilities for the mw-gadgets test suite.
//!
//! Provides unit builders, a tempdir-backed source tree writer, and a
//! deterministic [`HashSource`] so generated identities can be asserted on.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_gadget(tmp.path(), "core", "forum", &["forum.ts"]);
//! let forum = unit_requiring("core", "forum", &["core/ModalBuilder"]);
//! assert_eq!(ids(&[forum]), vec!["core/forum"]);
//! ```

use crate::payload::HashSource;
use crate::types::{BuildUnit, INTERFACE_SECTION};
use std::fs;
use std::path::Path;

// =========================================================================
// Unit builders
// =========================================================================

/// A unit with no files, no requirements and no conditions.
pub fn unit(section: &str, name: &str) -> BuildUnit {
    BuildUnit {
        section: section.to_string(),
        name: name.to_string(),
        description: None,
        code: Vec::new(),
        i18n: Vec::new(),
        requires: Vec::new(),
        disabled: false,
        conditions: None,
        flags: Default::default(),
    }
}

pub fn unit_requiring(section: &str, name: &str, requires: &[&str]) -> BuildUnit {
    BuildUnit {
        requires: requires.iter().map(|r| r.to_string()).collect(),
        ..unit(section, name)
    }
}

pub fn unit_with_code(section: &str, name: &str, code: &[&str]) -> BuildUnit {
    BuildUnit {
        code: code.iter().map(|c| c.to_string()).collect(),
        ..unit(section, name)
    }
}

/// All unit ids in order, as plain strings.
pub fn ids(units: &[BuildUnit]) -> Vec<String> {
    units.iter().map(|u| u.id().to_string()).collect()
}

// =========================================================================
// Source tree fixtures
// =========================================================================

/// Create `<root>/gadgets/<section>/<name>/` with the given files.
/// Each file's content is a one-line comment naming it.
pub fn write_gadget(root: &Path, section: &str, name: &str, files: &[&str]) {
    let dir = root.join("gadgets").join(section).join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), format!("/* {file} */\n")).unwrap();
    }
}

pub fn write_interface_file(root: &Path, file: &str) {
    let dir = root.join(INTERFACE_SECTION);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), format!("/* {file} */\n")).unwrap();
}

pub fn write_manifest(root: &Path, yaml: &str) {
    let dir = root.join("gadgets");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("gadgets-definition.yaml"), yaml).unwrap();
}

// =========================================================================
// Deterministic identity hashes
// =========================================================================

/// Yields `h0`, `h1`, `h2`, ... in order.
#[derive(Debug, Default)]
pub struct SequentialHashes {
    next: usize,
}

impl HashSource for SequentialHashes {
    fn next_hash(&mut self) -> String {
        let hash = format!("h{}", self.next);
        self.next += 1;
        hash
    }
}
