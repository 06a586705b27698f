//! Lookup of the bundler's compiled output.
//!
//! The JS/CSS bundler runs before this tool and leaves one compiled file per
//! declared code file. The inline payload strategy reads them back by output
//! key (see [`crate::naming::output_key`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// One compiled artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleItem {
    /// Executable script body.
    Chunk { code: String },
    /// Non-script asset, stylesheets included. May not be valid UTF-8.
    Asset { source: Vec<u8> },
}

impl BundleItem {
    /// Asset text with lossy UTF-8 decoding.
    pub fn asset_text(&self) -> Option<String> {
        match self {
            BundleItem::Asset { source } => Some(String::from_utf8_lossy(source).into_owned()),
            BundleItem::Chunk { .. } => None,
        }
    }
}

/// Compiled output keyed by `gadgets/<section>/<name>/<file>`.
pub trait BundleOutput {
    fn get(&self, key: &str) -> Option<BundleItem>;
}

impl BundleOutput for BTreeMap<String, BundleItem> {
    fn get(&self, key: &str) -> Option<BundleItem> {
        BTreeMap::get(self, key).cloned()
    }
}

/// A bundler output directory on disk. `.js` files are chunks, everything
/// else is an asset.
#[derive(Debug, Clone)]
pub struct DistBundle {
    root: PathBuf,
}

impl DistBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BundleOutput for DistBundle {
    fn get(&self, key: &str) -> Option<BundleItem> {
        let path = self.root.join(key);
        let is_chunk = path.extension().is_some_and(|ext| ext == "js");
        if is_chunk {
            fs::read_to_string(&path)
                .ok()
                .map(|code| BundleItem::Chunk { code })
        } else {
            fs::read(&path).ok().map(|source| BundleItem::Asset { source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dist_bundle_classifies_by_extension() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("gadgets/core/g");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("g.js"), "console.log(1);").unwrap();
        fs::write(dir.join("g.css"), ".a{}").unwrap();

        let bundle = DistBundle::new(tmp.path());
        assert_eq!(
            bundle.get("gadgets/core/g/g.js"),
            Some(BundleItem::Chunk {
                code: "console.log(1);".into()
            })
        );
        let css = bundle.get("gadgets/core/g/g.css").unwrap();
        assert_eq!(css.asset_text().as_deref(), Some(".a{}"));
        assert_eq!(bundle.get("gadgets/core/g/missing.js"), None);
    }

    #[test]
    fn asset_text_is_lossy() {
        let item = BundleItem::Asset {
            source: vec![b'a', 0xff, b'b'],
        };
        assert_eq!(item.asset_text().as_deref(), Some("a\u{fffd}b"));
        assert_eq!(BundleItem::Chunk { code: String::new() }.asset_text(), None);
    }

    #[test]
    fn map_bundle_lookup() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), BundleItem::Chunk { code: "x".into() });
        assert!(BundleOutput::get(&map, "k").is_some());
        assert!(BundleOutput::get(&map, "other").is_none());
    }
}
