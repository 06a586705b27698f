//! Static URLs of built files as served by the dev/preview server.
//!
//! ```text
//! <origin>/gadgets/<section>/<name>/<compiled file>
//! <origin>/gadgets/<section>/<name>/gadget-impl.js     per-unit bundle
//! <origin>/mediawiki/<compiled file>                    interface code
//! <origin>/mediawiki/gadget-impl.js
//! ```
//!
//! Path segments are percent-encoded, so gadget and file names may contain
//! spaces or quotes.

use crate::naming::compiled_file_name;
use crate::types::{BuildUnit, INTERFACE_SECTION};
use thiserror::Error;
use url::Url;

/// File name of a unit's rolled-up registration bundle.
pub const UNIT_BUNDLE_FILE: &str = "gadget-impl.js";

#[derive(Error, Debug)]
pub enum OriginError {
    #[error("Invalid server origin: {0}")]
    Parse(#[from] url::ParseError),
    #[error("Server origin cannot hold a path: {0}")]
    NotABase(String),
}

#[derive(Debug, Clone)]
pub struct StaticUrls {
    origin: Url,
}

impl StaticUrls {
    pub fn new(origin: &str) -> Result<Self, OriginError> {
        let origin = Url::parse(origin)?;
        if origin.cannot_be_a_base() {
            return Err(OriginError::NotABase(origin.to_string()));
        }
        Ok(Self { origin })
    }

    /// URL of the compiled form of one of the unit's code files.
    pub fn file_url(&self, unit: &BuildUnit, file: &str) -> String {
        self.under_unit(unit, &compiled_file_name(file))
    }

    /// URL of the unit's `gadget-impl.js`.
    pub fn unit_bundle_url(&self, unit: &BuildUnit) -> String {
        self.under_unit(unit, UNIT_BUNDLE_FILE)
    }

    fn under_unit(&self, unit: &BuildUnit, file: &str) -> String {
        if unit.is_interface() {
            self.join(&[INTERFACE_SECTION, file])
        } else {
            self.join(&["gadgets", &unit.section, &unit.name, file])
        }
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut url = self.origin.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::unit;

    #[test]
    fn gadget_file_url_uses_compiled_name() {
        let urls = StaticUrls::new("http://localhost:5173").unwrap();
        let u = unit("core", "QuickPurge");
        assert_eq!(
            urls.file_url(&u, "QuickPurge.ts"),
            "http://localhost:5173/gadgets/core/QuickPurge/QuickPurge.js"
        );
        assert_eq!(
            urls.file_url(&u, "QuickPurge.less"),
            "http://localhost:5173/gadgets/core/QuickPurge/QuickPurge.css"
        );
    }

    #[test]
    fn segments_are_percent_encoded() {
        let urls = StaticUrls::new("http://localhost:5173/").unwrap();
        let u = unit("core", "bottom toolbar");
        assert_eq!(
            urls.file_url(&u, "bottom toolbar.ts"),
            "http://localhost:5173/gadgets/core/bottom%20toolbar/bottom%20toolbar.js"
        );
        assert!(!urls.file_url(&unit("s", "a\"b"), "x.js").contains('"'));
    }

    #[test]
    fn origin_path_is_kept() {
        let urls = StaticUrls::new("https://dev.example.org/wiki-assets/").unwrap();
        assert_eq!(
            urls.unit_bundle_url(&unit("core", "forum")),
            "https://dev.example.org/wiki-assets/gadgets/core/forum/gadget-impl.js"
        );
    }

    #[test]
    fn interface_urls_are_flat() {
        let urls = StaticUrls::new("http://localhost:4173").unwrap();
        let u = unit(INTERFACE_SECTION, "vector");
        assert_eq!(
            urls.file_url(&u, "Vector.less"),
            "http://localhost:4173/mediawiki/Vector.css"
        );
        assert_eq!(
            urls.unit_bundle_url(&u),
            "http://localhost:4173/mediawiki/gadget-impl.js"
        );
    }

    #[test]
    fn rejects_bad_origins() {
        assert!(matches!(StaticUrls::new("localhost"), Err(OriginError::Parse(_))));
        assert!(matches!(
            StaticUrls::new("mailto:dev@example.org"),
            Err(OriginError::NotABase(_))
        ));
    }
}
