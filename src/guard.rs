//! Conditional loading guards.
//!
//! ResourceLoader only loads a gadget when the page matches its declared
//! rights, skins, actions, categories, namespaces and content models, and
//! only runs it once its extra module dependencies are ready. A generated
//! entrypoint bypasses ResourceLoader's gadget registry, so the same rules
//! are re-created as JavaScript wrapped around each registration:
//!
//! ```js
//! if ([..].some(..) && [..].some(..)) {                 // conditions
//! mw.loader.using([ "mediawiki.api" ], function (require) {  // dependencies
//! ...registration...
//! });
//! }
//! ```
//!
//! The conjunction order is fixed by category, never by manifest order:
//! rights, skins, actions, categories, namespaces, content models.
//!
//! Generated code sticks to ES5 (`function` expressions, `indexOf`).

use crate::js::{string_array, string_literal};
use crate::types::Conditions;

/// How a category's config value is compared against the declared list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    /// `mw.config.get(key)` is a single value equal to one of the list.
    Value,
    /// `mw.config.get(key)` is a list intersecting the declared list.
    List,
}

struct Category {
    config_key: &'static str,
    membership: Membership,
    numeric: bool,
}

const RIGHTS: Category = Category {
    config_key: "wgUserRights",
    membership: Membership::List,
    numeric: false,
};
const SKINS: Category = Category {
    config_key: "skin",
    membership: Membership::Value,
    numeric: false,
};
const ACTIONS: Category = Category {
    config_key: "wgAction",
    membership: Membership::Value,
    numeric: false,
};
const CATEGORIES: Category = Category {
    config_key: "wgCategories",
    membership: Membership::List,
    numeric: false,
};
const NAMESPACES: Category = Category {
    config_key: "wgNamespaceNumber",
    membership: Membership::Value,
    numeric: true,
};
const CONTENT_MODELS: Category = Category {
    config_key: "wgPageContentModel",
    membership: Membership::Value,
    numeric: false,
};

/// Code fragments to place before and after a registration.
///
/// `head` opens from outermost to innermost, `tail` closes from innermost to
/// outermost, so `head + body + tail` is always balanced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guard {
    pub head: Vec<String>,
    pub tail: Vec<String>,
}

impl Guard {
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }

    /// Surround `body` with the guard, one fragment per line.
    pub fn wrap(&self, body: &str) -> String {
        let mut parts: Vec<&str> = self.head.iter().map(String::as_str).collect();
        parts.push(body);
        parts.extend(self.tail.iter().map(String::as_str));
        parts.join("\n")
    }
}

/// Build the guard for a unit's conditions.
pub fn synthesize(conditions: Option<&Conditions>) -> Guard {
    let Some(conditions) = conditions.filter(|c| !c.is_empty()) else {
        return Guard::default();
    };

    let checks = [
        (&conditions.rights, RIGHTS),
        (&conditions.skins, SKINS),
        (&conditions.actions, ACTIONS),
        (&conditions.categories, CATEGORIES),
        (&conditions.namespaces, NAMESPACES),
        (&conditions.content_models, CONTENT_MODELS),
    ];
    let expressions: Vec<String> = checks
        .iter()
        .filter_map(|(values, category)| values.as_ref().map(|v| membership_test(v, category)))
        .collect();

    let mut guard = Guard::default();
    if !expressions.is_empty() {
        guard.head.push(format!("if ({}) {{", expressions.join(" && ")));
        guard.tail.insert(0, "}".to_string());
    }

    if let Some(dependencies) = &conditions.dependencies {
        let modules: Vec<String> = dependencies.iter().map(|d| string_literal(d)).collect();
        guard.head.push(format!(
            "mw.loader.using([ {} ], function (require) {{",
            modules.join(", ")
        ));
        guard.tail.insert(0, "});".to_string());
    }

    guard
}

fn membership_test(values: &[String], category: &Category) -> String {
    let array = if category.numeric {
        numeric_array(values)
    } else {
        string_array(values)
    };
    let key = category.config_key;
    match category.membership {
        Membership::Value => format!(
            "{array}.some(function (a) {{ return mw.config.get('{key}') === a; }})"
        ),
        Membership::List => format!(
            "{array}.some(function (a) {{ return (mw.config.get('{key}') || []).indexOf(a) > -1; }})"
        ),
    }
}

/// Integers are emitted bare; anything that is not an integer is quoted,
/// which can never equal a numeric config value.
fn numeric_array(values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| match v.parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => string_literal(v),
        })
        .collect();
    format!("[{}]", items.join(","))
}
