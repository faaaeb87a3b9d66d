//! Locating tag boundaries.
//!
//! All delimiters are ASCII, so every index returned here is a char boundary.

use super::{ACTION_END, ACTION_ESCAPE, ACTION_PREFIX, STYLE_ESCAPE, STYLE_PREFIX};

/// First occurrence of `needle` at or after `from`.
#[inline]
pub(crate) fn find_from(source: &str, needle: &str, from: usize) -> Option<usize> {
    source.get(from..)?.find(needle).map(|i| from + i)
}

/// First occurrence of `needle` at or after `from` that is not preceded by
/// `escape`. An occurrence at index 0 is never escaped.
pub(crate) fn find_unescaped(source: &str, needle: &str, from: usize, escape: char) -> Option<usize> {
    let mut offset = from;
    loop {
        let index = find_from(source, needle, offset)?;
        if index > 0 && source[..index].ends_with(escape) {
            offset = index + 1;
            continue;
        }
        return Some(index);
    }
}

/// The smaller of two candidate indices.
#[inline]
pub(crate) fn nearest(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[inline]
pub(crate) fn next_style(source: &str, from: usize) -> Option<usize> {
    find_unescaped(source, STYLE_PREFIX, from, STYLE_ESCAPE)
}

#[inline]
pub(crate) fn next_action(source: &str, from: usize) -> Option<usize> {
    find_unescaped(source, ACTION_PREFIX, from, ACTION_ESCAPE)
}

/// The `{/#}` closing the action whose body starts at `from`.
///
/// Each unescaped `#{` met before an end-marker candidate opens a nested
/// action and skips one candidate.
pub(crate) fn find_action_end(source: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut offset = from;
    loop {
        let end = find_from(source, ACTION_END, offset)?;
        match next_action(source, offset) {
            Some(open) if open < end => {
                depth += 1;
                offset = open + ACTION_PREFIX.len();
            }
            _ if depth > 0 => {
                depth -= 1;
                offset = end + ACTION_END.len();
            }
            _ => return Some(end),
        }
    }
}
