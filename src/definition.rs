//! Rendering of the `MediaWiki:Gadgets-definition` page.
//!
//! Once built gadgets are uploaded to the wiki, the Gadgets extension needs a
//! definition line for each of them:
//!
//! ```text
//! == core ==
//! * QuickPurge[ResourceLoader|default|dependencies=mediawiki.api|rights=purge]|QuickPurge.js
//! * forum[ResourceLoader|dependencies=ext.gadget.ModalBuilder]|forum.js|forum.css
//! ```
//!
//! Sections appear in the order their first unit does. Required units are
//! turned into `dependencies` on their registered module names, after the
//! declared ResourceLoader dependencies.

use crate::naming::compiled_file_name;
use crate::types::BuildUnit;
use indexmap::IndexMap;

/// Render the definition page for `units`. Interface code is not a gadget
/// and is left out.
pub fn render_definition(units: &[BuildUnit], namespace: &str) -> String {
    let mut sections: IndexMap<&str, Vec<&BuildUnit>> = IndexMap::new();
    for unit in units.iter().filter(|u| !u.is_interface()) {
        sections.entry(unit.section.as_str()).or_default().push(unit);
    }

    let mut lines = Vec::new();
    for (section, units) in sections {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("== {section} =="));
        lines.extend(units.into_iter().map(|u| definition_line(u, namespace)));
    }

    let mut page = lines.join("\n");
    if !page.is_empty() {
        page.push('\n');
    }
    page
}

/// `* name[options]|file|file`
pub fn definition_line(unit: &BuildUnit, namespace: &str) -> String {
    let mut line = format!("* {}[{}]", unit.name, options(unit, namespace).join("|"));
    for file in &unit.code {
        line.push('|');
        line.push_str(&compiled_file_name(file));
    }
    line
}

fn options(unit: &BuildUnit, namespace: &str) -> Vec<String> {
    let flags = &unit.flags;
    let conditions = unit.conditions.clone().unwrap_or_default();

    let mut dependencies = conditions.dependencies.unwrap_or_default();
    dependencies.extend(unit.requires.iter().map(|id| {
        let name = id.rsplit('/').next().unwrap_or(id.as_str());
        format!("{namespace}.{name}")
    }));

    let mut options = vec!["ResourceLoader".to_string()];
    if flags.default {
        options.push("default".into());
    }
    if flags.hidden {
        options.push("hidden".into());
    }
    let lists = [
        ("dependencies", Some(dependencies)),
        ("rights", conditions.rights),
        ("skins", conditions.skins),
        ("actions", conditions.actions),
        ("categories", conditions.categories),
        ("namespaces", conditions.namespaces),
        ("contentModels", conditions.content_models),
        ("peers", Some(flags.peers.clone())),
    ];
    for (key, values) in lists {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            options.push(format!("{key}={}", values.join(",")));
        }
    }
    if let Some(module_type) = &flags.module_type {
        options.push(format!("type={module_type}"));
    }
    if flags.package {
        options.push("package".into());
    }
    if flags.supports_url_load {
        options.push("supportsUrlLoad".into());
    }
    options
}
