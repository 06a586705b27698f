//! Compilation of one unit into a `mw.loader.impl` registration.
//!
//! Every unit becomes one self-contained statement:
//!
//! ```js
//! (function (mw) {
//! <guard head>
//! mw.loader.impl(function () {
//! return [
//! "ext.gadget.QuickPurge@1f3a9c0e",        // identity
//! function ($, jQuery, require, module) {  // script
//! ...
//! }, {"css": [ ... ]}, {}, {}, null];       // styles + reserved slots
//! });
//! <guard tail>
//! })(mediaWiki);
//! ```
//!
//! ## Strategies
//!
//! - [`Strategy::Inline`] copies the bundler's compiled scripts and
//!   stylesheets into the statement. Larger, but needs no further requests.
//! - [`Strategy::Lazy`] registers a function that fetches each script URL via
//!   the entrypoint's `loadLazily` helper and hands ResourceLoader a list of
//!   stylesheet URLs. Small and fast to parse; each active gadget costs extra
//!   requests.
//!
//! ## Identity
//!
//! The registered name is `<namespace>.<name>@<hash>`. The hash comes from a
//! [`HashSource`] and is fresh on every compile so a rebuilt gadget never
//! collides with a cached registration of the previous build. It is never
//! derived from content.

use crate::bundle::{BundleItem, BundleOutput};
use crate::guard::synthesize;
use crate::js::{StyleQuote, string_literal, style_literal};
use crate::naming::{output_key, unit_prefix};
use crate::source::SourceTree;
use crate::transform::{Transform, TransformError};
use crate::types::{BuildUnit, UnitId};
use crate::urls::{StaticUrls, UNIT_BUNDLE_FILE};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Registration prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "ext.gadget";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Cannot resolve gadget {0}")]
    Unresolved(UnitId),
    #[error("No compiled {kind} for {id} at {key}")]
    MissingOutput {
        id: UnitId,
        key: String,
        kind: &'static str,
    },
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

impl PayloadError {
    /// Transform failures indicate broken generated code and abort the build;
    /// the rest only affect the unit at hand.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PayloadError::Transform(_))
    }
}

/// Source of the random component of registration identities.
pub trait HashSource {
    fn next_hash(&mut self) -> String;
}

/// Eight hex digits from four random bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHash;

impl HashSource for RandomHash {
    fn next_hash(&mut self) -> String {
        hex::encode(rand::random::<[u8; 4]>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Inline,
    Lazy,
}

/// Collaborators the compiler reads from.
#[derive(Clone, Copy)]
pub struct CompileSources<'a> {
    pub tree: &'a dyn SourceTree,
    pub bundle: &'a dyn BundleOutput,
    pub urls: &'a StaticUrls,
    pub transform: &'a dyn Transform,
    /// Path reported to the transform for lazily-loading registrations,
    /// which end up in the entrypoint.
    pub entrypoint: &'a Path,
}

pub struct PayloadCompiler<'a> {
    namespace: String,
    strategy: Strategy,
    minify: bool,
    sources: CompileSources<'a>,
    hashes: Box<dyn HashSource + 'a>,
}

impl<'a> PayloadCompiler<'a> {
    pub fn new(
        namespace: impl Into<String>,
        strategy: Strategy,
        minify: bool,
        sources: CompileSources<'a>,
        hashes: Box<dyn HashSource + 'a>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            strategy,
            minify,
            sources,
            hashes,
        }
    }

    pub fn urls(&self) -> &StaticUrls {
        self.sources.urls
    }

    /// `<namespace>.<name>@<fresh hash>`.
    pub fn identity(&mut self, unit: &BuildUnit) -> String {
        format!("{}.{}@{}", self.namespace, unit.name, self.hashes.next_hash())
    }

    /// Compile a unit into its guarded, transformed registration statement.
    pub fn compile(&mut self, unit: &BuildUnit) -> Result<String, PayloadError> {
        if !self.sources.tree.unit_exists(&unit.section, &unit.name) {
            return Err(PayloadError::Unresolved(unit.id()));
        }

        let identity = self.identity(unit);
        let (registration, minify, virtual_path) = match self.strategy {
            Strategy::Inline => (
                self.inline_registration(unit, &identity)?,
                self.minify,
                PathBuf::from(format!("{}/{}", unit_prefix(unit), UNIT_BUNDLE_FILE)),
            ),
            Strategy::Lazy => (
                self.lazy_registration(unit, &identity),
                false,
                self.sources.entrypoint.to_path_buf(),
            ),
        };

        let guarded = synthesize(unit.conditions.as_ref()).wrap(&registration);
        let source = ["(function (mw) {", guarded.as_str(), "})(mediaWiki);"].join("\n");

        Ok(self
            .sources
            .transform
            .transform(&source, &virtual_path, minify)?)
    }

    fn inline_registration(
        &self,
        unit: &BuildUnit,
        identity: &str,
    ) -> Result<String, PayloadError> {
        let mut scripts = Vec::new();
        for script in unit.scripts() {
            let key = output_key(unit, script);
            match self.sources.bundle.get(&key) {
                Some(BundleItem::Chunk { code }) => scripts.push(code),
                _ => {
                    return Err(PayloadError::MissingOutput {
                        id: unit.id(),
                        key,
                        kind: "script",
                    });
                }
            }
        }

        let quote = StyleQuote::for_minify(self.minify);
        let mut styles = Vec::new();
        for style in unit.styles() {
            let key = output_key(unit, style);
            let css = self
                .sources
                .bundle
                .get(&key)
                .and_then(|item| item.asset_text())
                .ok_or_else(|| PayloadError::MissingOutput {
                    id: unit.id(),
                    key: key.clone(),
                    kind: "stylesheet",
                })?;
            styles.push(style_literal(css.trim(), quote));
        }

        Ok([
            "mw.loader.impl(function () {".to_string(),
            "return [".to_string(),
            format!("{},", string_literal(identity)),
            "function ($, jQuery, require, module) {".to_string(),
            scripts.join("\n"),
            format!("}}, {{\"css\": [{}]}}, {{}}, {{}}, null];", styles.join(", ")),
            "});".to_string(),
        ]
        .join("\n"))
    }

    fn lazy_registration(&self, unit: &BuildUnit, identity: &str) -> String {
        let urls = self.sources.urls;
        let loads: Vec<String> = unit
            .scripts()
            .map(|script| format!("loadLazily({});", string_literal(&urls.file_url(unit, script))))
            .collect();
        let styles: Vec<String> = unit
            .styles()
            .map(|style| string_literal(&urls.file_url(unit, style)))
            .collect();

        [
            "mw.loader.impl(function () {".to_string(),
            "return [".to_string(),
            format!("{},", string_literal(identity)),
            "function () {".to_string(),
            loads.join("\n"),
            "},".to_string(),
            format!("{{\"url\": {{\"all\": [{}] }}}},", styles.join(",")),
            "{}, {}, null".to_string(),
            "];".to_string(),
            "});".to_string(),
        ]
        .join("\n")
    }
}
