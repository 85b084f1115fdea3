// src/scan/directive.rs

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `@` + keyword, then the rest of the physical line.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z][A-Za-z0-9_]*)([^\n]*)").expect("directive pattern is valid")
});

static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("literal pattern is valid"));

/// One build annotation found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `@requires "a" "b"`: raw literals, unresolved.
    Requires(Vec<String>),
    /// `@produces "name" <command>`: raw command template, untouched.
    Produces { name: String, command: String },
    /// `@default "t1" "t2"`
    Default(Vec<String>),
}

/// Find every directive in `text`, in order of appearance.
///
/// Unknown keywords are ignored, as is a `@produces` without a quoted name.
pub fn parse_directives(text: &str) -> Vec<Directive> {
    let mut out = Vec::new();

    for caps in DIRECTIVE.captures_iter(text) {
        let keyword = &caps[1];
        let rest = caps.get(2).map_or("", |m| m.as_str());

        match keyword {
            "requires" => out.push(Directive::Requires(literals(rest))),
            "default" => out.push(Directive::Default(literals(rest))),
            "produces" => match LITERAL.captures(rest) {
                Some(lit) => {
                    let whole = lit.get(0).map_or(rest.len(), |m| m.end());
                    out.push(Directive::Produces {
                        name: lit[1].to_string(),
                        command: rest[whole..].trim().to_string(),
                    });
                }
                None => {
                    debug!(line = %caps[0].trim_end(), "@produces without a quoted name; skipping");
                }
            },
            other => {
                debug!(keyword = %other, "ignoring unknown directive");
            }
        }
    }

    out
}

fn literals(rest: &str) -> Vec<String> {
    LITERAL
        .captures_iter(rest)
        .map(|c| c[1].to_string())
        .collect()
}
