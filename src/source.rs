//! Source tree lookups.
//!
//! Gadget sources live under `<root>/gadgets/<section>/<name>/`; the wiki's
//! global interface code lives flat under `<root>/mediawiki/`:
//!
//! ```text
//! src/
//! ├── gadgets/
//! │   ├── gadgets-definition.yaml
//! │   └── core/
//! │       └── QuickPurge/
//! │           ├── QuickPurge.ts
//! │           └── i18n.json
//! └── mediawiki/
//!     ├── Common.ts
//!     ├── Common.less
//!     └── Vector.less          # gated on skin = vector
//! ```
//!
//! Selection and payload compilation only see the [`SourceTree`] trait, so
//! they can be exercised against any layout.

use crate::naming::parse_file_name;
use crate::types::{BuildUnit, Conditions, INTERFACE_SECTION};
use std::collections::BTreeMap;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Interface code stem that loads on every skin.
const COMMON_STEM: &str = "common";

/// Filesystem existence checks keyed by `(section, name, file)`.
pub trait SourceTree {
    /// Directory that holds a unit's files.
    fn unit_dir(&self, section: &str, name: &str) -> PathBuf;

    fn unit_exists(&self, section: &str, name: &str) -> bool {
        self.unit_dir(section, name).is_dir()
    }

    fn file_exists(&self, section: &str, name: &str, file: &str) -> bool {
        self.unit_dir(section, name).join(file).is_file()
    }
}

/// The on-disk source layout rooted at `root`.
#[derive(Debug, Clone)]
pub struct FsSourceTree {
    root: PathBuf,
}

impl FsSourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn gadgets_dir(&self) -> PathBuf {
        self.root.join("gadgets")
    }

    pub fn interface_dir(&self) -> PathBuf {
        self.root.join(INTERFACE_SECTION)
    }

    /// Group the files of `mediawiki/` into interface units.
    ///
    /// Files are grouped by lowercased stem: `Common.ts` and `Common.less`
    /// form the `common` unit, which loads everywhere; every other group is
    /// gated on the skin of the same name (`Vector.less` → `skins: [vector]`).
    /// Groups are ordered by name.
    pub fn interface_units(&self) -> Result<Vec<BuildUnit>, walkdir::Error> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in WalkDir::new(self.interface_dir())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            let key = parse_file_name(&filename).stem.to_lowercase();
            groups.entry(key).or_default().push(filename);
        }

        Ok(groups
            .into_iter()
            .map(|(key, code)| {
                let conditions = (key != COMMON_STEM).then(|| Conditions {
                    skins: Some(vec![key.clone()]),
                    ..Default::default()
                });
                BuildUnit {
                    section: INTERFACE_SECTION.to_string(),
                    name: key,
                    description: None,
                    code,
                    i18n: Vec::new(),
                    requires: Vec::new(),
                    disabled: false,
                    conditions,
                    flags: Default::default(),
                }
            })
            .collect())
    }
}

impl SourceTree for FsSourceTree {
    fn unit_dir(&self, section: &str, name: &str) -> PathBuf {
        if section == INTERFACE_SECTION {
            self.interface_dir()
        } else {
            self.gadgets_dir().join(section).join(name)
        }
    }
}
