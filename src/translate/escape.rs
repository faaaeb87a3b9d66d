//! Escaping of tag introducers.

use super::{
    ACTION_PREFIX, ESCAPED_ACTION_PREFIX, ESCAPED_HOVER_SUFFIX, ESCAPED_PLACEHOLDER_PREFIX,
    ESCAPED_STYLE_PREFIX, HOVER_SUFFIX, PLACEHOLDER_PREFIX, STYLE_PREFIX,
};
use std::iter;

/// Escape every tag introducer so `text` parses back to itself.
pub fn escape(text: &str) -> String {
    let text = text
        .replace(PLACEHOLDER_PREFIX, ESCAPED_PLACEHOLDER_PREFIX)
        .replace(STYLE_PREFIX, ESCAPED_STYLE_PREFIX)
        .replace(ACTION_PREFIX, ESCAPED_ACTION_PREFIX);
    shift_end_markers(&text, Shift::Escape)
}

/// Escape `)` so `text` can be embedded as hover content.
pub fn escape_hover(text: &str) -> String {
    text.replace(HOVER_SUFFIX, ESCAPED_HOVER_SUFFIX)
}

/// Inverse of [`escape`].
pub fn strip_escapes(text: &str) -> String {
    strip_tag_escapes(&text.replace(ESCAPED_PLACEHOLDER_PREFIX, PLACEHOLDER_PREFIX))
}

/// Inverse of [`escape_hover`].
pub fn strip_hover_escapes(text: &str) -> String {
    text.replace(ESCAPED_HOVER_SUFFIX, HOVER_SUFFIX)
}

/// Undo style, action and end-marker escapes. Placeholder escapes are
/// consumed by substitution before the tag scan, so segment content only
/// needs these three.
pub(crate) fn strip_tag_escapes(text: &str) -> String {
    let text = text
        .replace(ESCAPED_STYLE_PREFIX, STYLE_PREFIX)
        .replace(ESCAPED_ACTION_PREFIX, ACTION_PREFIX);
    shift_end_markers(&text, Shift::Unescape)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Shift {
    Escape,
    Unescape,
}

/// End markers and their escapes share one shape: `{`, one or more `/`,
/// then `#}`. Escaping adds a slash to every such run and unescaping drops
/// one, so literal `{//#}` text survives a round trip as `{///#}`. A bare
/// `{/#}` is never unescaped.
fn shift_end_markers(text: &str, shift: Shift) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find("{/") {
        let (head, tail) = rest.split_at(at);
        out.push_str(head);

        let slashes = tail[1..].bytes().take_while(|b| *b == b'/').count();
        let (marker, after) = tail.split_at(1 + slashes);
        let slashes = match shift {
            Shift::Escape => Some(slashes + 1),
            Shift::Unescape if slashes > 1 => Some(slashes - 1),
            Shift::Unescape => None,
        };

        match slashes {
            Some(n) if after.starts_with("#}") => {
                out.push('{');
                out.extend(iter::repeat_n('/', n));
            }
            _ => out.push_str(marker),
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_introducers() {
        assert_eq!(
            escape("${variable} @{color} #{action} (parenthesis) {/#}"),
            "$${variable} @@{color} ##{action} (parenthesis) {//#}"
        );
    }

    #[test]
    fn hover_escape_only_touches_close_paren() {
        assert_eq!(
            escape_hover("${variable} @{color} #{action} (parenthesis)"),
            "${variable} @{color} #{action} (parenthesis\\)"
        );
    }

    #[test]
    fn strips_are_inverses() {
        assert_eq!(
            strip_escapes("$${variable} @@{color} ##{action} (parenthesis) {//#}"),
            "${variable} @{color} #{action} (parenthesis) {/#}"
        );
        assert_eq!(
            strip_hover_escapes("${variable} @{color} #{action} (parenthesis\\)"),
            "${variable} @{color} #{action} (parenthesis)"
        );
    }

    #[test]
    fn escaped_end_marker_text_round_trips() {
        assert_eq!(escape("a {//#} b {/#}"), "a {///#} b {//#}");
        assert_eq!(strip_escapes("a {///#} b {//#}"), "a {//#} b {/#}");
        assert_eq!(strip_tag_escapes("{/#} {/ #} {//x"), "{/#} {/ #} {//x");
    }

    #[test]
    fn tag_strip_leaves_placeholder_escapes() {
        assert_eq!(strip_tag_escapes("$${a} @@{b}"), "$${a} @{b}");
    }
}
