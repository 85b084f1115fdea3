// src/template/tokens.rs

use std::path::{Path, PathBuf};

use crate::fs::paths::dir_of;

/// Values substituted for the positional tokens of a command template.
///
/// | token | value                              |
/// |-------|------------------------------------|
/// | `$#`  | declaring source file              |
/// | `$~`  | directory of the source file       |
/// | `$^`  | requirements, space separated      |
/// | `$@`  | resolved product path              |
#[derive(Debug, Clone, Copy)]
pub struct TokenContext<'a> {
    pub source: &'a Path,
    pub requirements: &'a [PathBuf],
    pub output: &'a Path,
}

impl TokenContext<'_> {
    fn value_of(&self, token: char) -> Option<String> {
        match token {
            '#' => Some(self.source.to_string_lossy().into_owned()),
            '~' => Some(dir_of(self.source).to_string_lossy().into_owned()),
            '^' => Some(
                self.requirements
                    .iter()
                    .map(|r| r.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            '@' => Some(self.output.to_string_lossy().into_owned()),
            _ => None,
        }
    }
}

/// Substitute positional tokens in one left-to-right pass.
///
/// Inserted text is never scanned again, so a path containing `$@` comes
/// through untouched.
pub fn substitute_tokens(template: &str, ctx: &TokenContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(value) = chars.peek().and_then(|&t| ctx.value_of(t)) {
                out.push_str(&value);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }

    out
}
