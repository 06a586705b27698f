//! Inputs for the external JS/CSS bundler.
//!
//! The bundler needs one entry per code file, keyed by the bundler input key
//! (see [`crate::naming::input_key`]), plus the static files to copy next to
//! the compiled output. Printed as JSON by the `inputs` command:
//!
//! ```json
//! {
//!   "entries": {
//!     "gadgets/core/QuickPurge/QuickPurge": "src/gadgets/core/QuickPurge/QuickPurge.ts",
//!     "mediawiki/Common": "src/mediawiki/Common.ts"
//!   },
//!   "assets": [
//!     { "src": "src/gadgets/core/QuickPurge/i18n.json", "dest": "core/QuickPurge" }
//!   ]
//! }
//! ```
//!
//! Stylesheets are registered before scripts, so when a script and a
//! stylesheet share a stem the script owns the key.

use crate::naming::input_key;
use crate::source::SourceTree;
use crate::types::BuildUnit;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A file copied verbatim into the output directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyTarget {
    pub src: PathBuf,
    /// Destination directory, relative to the output directory.
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleInputs {
    pub entries: BTreeMap<String, PathBuf>,
    pub assets: Vec<CopyTarget>,
}

/// Map selected units and interface code to bundler entries and assets.
pub fn map_source_files(
    units: &[BuildUnit],
    interface: &[BuildUnit],
    tree: &dyn SourceTree,
) -> BundleInputs {
    let mut inputs = BundleInputs::default();

    for unit in interface.iter().chain(units) {
        let dir = tree.unit_dir(&unit.section, &unit.name);
        for file in unit.styles().chain(unit.scripts()) {
            inputs.entries.insert(input_key(unit, file), dir.join(file));
        }
        if unit.is_interface() {
            continue;
        }
        for file in &unit.i18n {
            inputs.assets.push(CopyTarget {
                src: dir.join(file),
                dest: Path::new(&unit.section).join(&unit.name),
            });
        }
    }

    inputs
}

/// Copy every asset into `dist`. Returns the number of files copied.
pub fn copy_assets(assets: &[CopyTarget], dist: &Path) -> std::io::Result<usize> {
    for asset in assets {
        let dest_dir = dist.join(&asset.dest);
        fs::create_dir_all(&dest_dir)?;
        let file_name = asset.src.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file: {}", asset.src.display()),
            )
        })?;
        fs::copy(&asset.src, dest_dir.join(file_name))?;
    }
    Ok(assets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSourceTree;
    use crate::test_helpers::{unit_with_code, write_gadget};
    use crate::types::INTERFACE_SECTION;
    use tempfile::TempDir;

    #[test]
    fn gadget_and_interface_entries() {
        let tree = FsSourceTree::new("/src");
        let mut gadget = unit_with_code("core", "QuickPurge", &["QuickPurge.ts", "style.less"]);
        gadget.i18n = vec!["i18n.json".into()];
        let interface = unit_with_code(INTERFACE_SECTION, "vector", &["Vector.less"]);

        let inputs = map_source_files(&[gadget], &[interface], &tree);
        let entries: Vec<(&str, &Path)> = inputs
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (
                    "gadgets/core/QuickPurge/QuickPurge",
                    Path::new("/src/gadgets/core/QuickPurge/QuickPurge.ts")
                ),
                (
                    "gadgets/core/QuickPurge/style",
                    Path::new("/src/gadgets/core/QuickPurge/style.less")
                ),
                ("mediawiki/Vector", Path::new("/src/mediawiki/Vector.less")),
            ]
        );
        assert_eq!(
            inputs.assets,
            vec![CopyTarget {
                src: PathBuf::from("/src/gadgets/core/QuickPurge/i18n.json"),
                dest: PathBuf::from("core/QuickPurge"),
            }]
        );
    }

    #[test]
    fn script_wins_shared_stem() {
        let tree = FsSourceTree::new("/src");
        let gadget = unit_with_code("core", "g", &["g.ts", "g.less"]);
        let inputs = map_source_files(&[gadget], &[], &tree);
        assert_eq!(inputs.entries.len(), 1);
        assert_eq!(
            inputs.entries["gadgets/core/g/g"],
            PathBuf::from("/src/gadgets/core/g/g.ts")
        );
    }

    #[test]
    fn serializes_as_json() {
        let tree = FsSourceTree::new("src");
        let inputs = map_source_files(&[unit_with_code("core", "g", &["g.js"])], &[], &tree);
        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json["entries"]["gadgets/core/g/g"], "src/gadgets/core/g/g.js");
        assert_eq!(json["assets"], serde_json::json!([]));
    }

    #[test]
    fn copies_assets_into_dist() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write_gadget(&src, "core", "g", &["i18n.json"]);
        let mut gadget = unit_with_code("core", "g", &[]);
        gadget.i18n = vec!["i18n.json".into()];

        let inputs = map_source_files(&[gadget], &[], &FsSourceTree::new(&src));
        let dist = tmp.path().join("dist");
        assert_eq!(copy_assets(&inputs.assets, &dist).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(dist.join("core/g/i18n.json")).unwrap(),
            "/* i18n.json */\n"
        );
    }

    #[test]
    fn missing_asset_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let assets = vec![CopyTarget {
            src: tmp.path().join("nope.json"),
            dest: PathBuf::from("core/g"),
        }];
        assert!(copy_assets(&assets, tmp.path()).is_err());
    }
}
