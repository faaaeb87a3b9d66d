//! `${name}` / `${name:default}` substitution.
//!
//! `$${` is an escaped prefix: the `$` is dropped and the text is kept
//! verbatim. Substituted values are expanded again, so a value may itself
//! reference other placeholders.

use super::{
    ParseContext, PLACEHOLDER_ESCAPE, PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX,
    PLACEHOLDER_VALUE_DELIMITER,
};
use crate::error::{Error, Result};

/// Substitute every placeholder in `template` from `context`.
pub(crate) fn substitute(template: &str, context: &ParseContext<'_>) -> Result<String> {
    let mut resolving = Vec::new();
    expand(template, context, &mut resolving)
}

fn expand<'a>(
    src: &'a str,
    context: &ParseContext<'a>,
    resolving: &mut Vec<&'a str>,
) -> Result<String> {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;

    while !rest.is_empty() {
        let Some(open) = rest.find(PLACEHOLDER_PREFIX) else {
            out.push_str(rest);
            break;
        };
        let after_open = &rest[open + PLACEHOLDER_PREFIX.len()..];

        if rest[..open].ends_with(PLACEHOLDER_ESCAPE) {
            out.push_str(&rest[..open - PLACEHOLDER_ESCAPE.len_utf8()]);
            out.push_str(PLACEHOLDER_PREFIX);
            rest = after_open;
            continue;
        }

        let Some(close) = after_open.find(PLACEHOLDER_SUFFIX) else {
            // Unclosed `${` stays literal.
            out.push_str(rest);
            break;
        };

        out.push_str(&rest[..open]);

        let body = &after_open[..close];
        let (name, default) = match body.split_once(PLACEHOLDER_VALUE_DELIMITER) {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };

        let value = context
            .get(name)
            .or(default)
            .ok_or_else(|| Error::UndefinedPlaceholder {
                name: name.to_owned(),
            })?;

        if resolving.contains(&name) {
            return Err(Error::CyclicPlaceholder {
                name: name.to_owned(),
            });
        }
        resolving.push(name);
        out.push_str(&expand(value, context, resolving)?);
        resolving.pop();

        rest = &after_open[close + PLACEHOLDER_SUFFIX.len()..];
    }

    Ok(out)
}
