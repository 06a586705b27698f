//! Centralized filename handling for gadget code files.
//!
//! Gadget definitions list their code files by source name (`Foo.ts`,
//! `Foo.less`). Everything downstream needs a consistent answer to three
//! questions about such a name:
//!
//! - is it a script, a stylesheet, or neither ([`FileKind`]);
//! - what does the bundler call its compiled output (`Foo.js`, `Foo.css`);
//! - what key does the bundler use for it (with or without extension).
//!
//! ## Bundle Keys
//!
//! ```text
//! gadgets/core/QuickPurge/QuickPurge.ts    source file
//! gadgets/core/QuickPurge/QuickPurge       bundler input key
//! gadgets/core/QuickPurge/QuickPurge.js    bundler output key
//! mediawiki/Vector.less                    interface source file
//! mediawiki/Vector.css                     interface output key
//! ```

use crate::types::{BuildUnit, INTERFACE_SECTION};

const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts", "cts", "jsx", "tsx"];
const STYLE_EXTENSIONS: &[&str] = &["css", "less", "scss", "sass"];

/// Classification of a code file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Script,
    Style,
    Other,
}

/// Result of splitting a filename like `bottom toolbar.less`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Everything before the last dot. The full input when there is no extension.
    pub stem: String,
    /// Lowercased extension without the dot, if any.
    pub extension: Option<String>,
    pub kind: FileKind,
}

/// Split a code filename into stem, extension and kind.
///
/// - `"QuickPurge.ts"` → stem="QuickPurge", extension=Some("ts"), kind=Script
/// - `"PreviewVid.LESS"` → stem="PreviewVid", extension=Some("less"), kind=Style
/// - `"i18n.json"` → kind=Other
/// - `".eslintrc"` → stem=".eslintrc", extension=None, kind=Other
pub fn parse_file_name(filename: &str) -> ParsedFile {
    let split = filename.rfind('.').filter(|&pos| pos > 0);
    let (stem, extension) = match split {
        Some(pos) => (
            filename[..pos].to_string(),
            Some(filename[pos + 1..].to_ascii_lowercase()),
        ),
        None => (filename.to_string(), None),
    };
    let kind = match extension.as_deref() {
        Some(ext) if SCRIPT_EXTENSIONS.contains(&ext) => FileKind::Script,
        Some(ext) if STYLE_EXTENSIONS.contains(&ext) => FileKind::Style,
        _ => FileKind::Other,
    };
    ParsedFile {
        stem,
        extension,
        kind,
    }
}

pub fn file_kind(filename: &str) -> FileKind {
    parse_file_name(filename).kind
}

/// Name of the compiled artifact the bundler emits for a source file.
///
/// Scripts become `.js`, stylesheets `.css`; anything else keeps its name.
pub fn compiled_file_name(filename: &str) -> String {
    let parsed = parse_file_name(filename);
    match parsed.kind {
        FileKind::Script => format!("{}.js", parsed.stem),
        FileKind::Style => format!("{}.css", parsed.stem),
        FileKind::Other => filename.to_string(),
    }
}

/// Directory prefix shared by every bundle key of a unit.
pub fn unit_prefix(unit: &BuildUnit) -> String {
    if unit.section == INTERFACE_SECTION {
        INTERFACE_SECTION.to_string()
    } else {
        format!("gadgets/{}/{}", unit.section, unit.name)
    }
}

/// Bundler input key: unit prefix plus the file stem, no extension.
pub fn input_key(unit: &BuildUnit, filename: &str) -> String {
    format!("{}/{}", unit_prefix(unit), parse_file_name(filename).stem)
}

/// Bundler output key: unit prefix plus the compiled file name.
pub fn output_key(unit: &BuildUnit, filename: &str) -> String {
    format!("{}/{}", unit_prefix(unit), compiled_file_name(filename))
}
