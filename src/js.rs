//! JavaScript literal rendering.
//!
//! Generated code embeds manifest values (module names, rights, URLs) and
//! whole stylesheets inside string literals. Everything that ends up between
//! quotes goes through this module.

/// Delimiter used for an embedded stylesheet.
///
/// Minified output uses plain double-quoted strings; readable output uses
/// template literals so multi-line CSS stays multi-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleQuote {
    Double,
    Backtick,
}

impl StyleQuote {
    pub fn for_minify(minify: bool) -> Self {
        if minify {
            StyleQuote::Double
        } else {
            StyleQuote::Backtick
        }
    }

    pub fn delimiter(self) -> char {
        match self {
            StyleQuote::Double => '"',
            StyleQuote::Backtick => '`',
        }
    }
}

/// Render `value` as a double-quoted JS string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a comma-separated array of string literals: `["a","b"]`.
pub fn string_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("[{}]", items.join(","))
}

/// Render stylesheet text as a literal with the given delimiter.
///
/// Backslashes and the delimiter are always escaped. Template literals also
/// escape `${` so CSS can never start an interpolation; double-quoted
/// literals escape line breaks, which they cannot contain.
pub fn style_literal(css: &str, quote: StyleQuote) -> String {
    let mut out = String::with_capacity(css.len() + 2);
    out.push(quote.delimiter());
    let mut chars = css.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, quote) {
            ('\\', _) => out.push_str("\\\\"),
            ('"', StyleQuote::Double) => out.push_str("\\\""),
            ('\n', StyleQuote::Double) => out.push_str("\\n"),
            ('\r', StyleQuote::Double) => out.push_str("\\r"),
            ('`', StyleQuote::Backtick) => out.push_str("\\`"),
            ('$', StyleQuote::Backtick) if chars.peek() == Some(&'{') => out.push_str("\\$"),
            (c, _) => out.push(c),
        }
    }
    out.push(quote.delimiter());
    out
}
