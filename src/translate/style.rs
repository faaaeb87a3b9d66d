//! `@{modifier:modifier}` style tags.

use super::{STYLE_PREFIX, STYLE_SEPARATOR, STYLE_SUFFIX, scanner::find_from};
use crate::{
    error::{Malformed, Result},
    message::{Color, Decoration, Decorations, SegmentBuilder},
};
use tracing::trace;

/// The color and decorations opened by one style tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Style {
    pub color: Option<Color>,
    pub decorations: Decorations,
}

impl Style {
    pub fn apply(self, mut builder: SegmentBuilder) -> SegmentBuilder {
        if let Some(color) = self.color {
            builder = builder.color(color);
        }
        builder.decorations(self.decorations)
    }
}

/// A parsed style tag; `end` is the first byte after its `}`.
#[derive(Debug)]
pub(crate) struct StyleTag {
    pub style: Style,
    pub end: usize,
}

/// Parse the style tag opening at `open`.
///
/// A tag with no modifiers (`@{}`) resets styling for the following run.
pub(crate) fn parse_tag(source: &str, open: usize) -> Result<StyleTag> {
    let start = open + STYLE_PREFIX.len();
    let close = find_from(source, STYLE_SUFFIX, start).ok_or_else(|| {
        Malformed::new(source, start, "style tag missing a close brace")
    })?;

    let mut style = Style::default();
    let body = &source[start..close];
    if body.trim().is_empty() {
        trace!(at = open, "style reset");
        return Ok(StyleTag {
            style,
            end: close + STYLE_SUFFIX.len(),
        });
    }

    for modifier in body.split(STYLE_SEPARATOR).filter(|m| !m.is_empty()) {
        if let Some(color) = Color::parse(modifier) {
            style.color = Some(color);
            continue;
        }
        if let Some(decoration) = Decoration::from_name(modifier) {
            style.decorations.insert(decoration.flag());
            continue;
        }
        return Err(Malformed::new(
            source,
            start,
            format!("style tag contains an unrecognized modifier '{modifier}'"),
        )
        .into());
    }

    trace!(at = open, ?style, "style tag");
    Ok(StyleTag {
        style,
        end: close + STYLE_SUFFIX.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, message::color};

    fn style(src: &str) -> Style {
        parse_tag(src, 0).unwrap().style
    }

    #[test]
    fn empty_tag_is_reset() {
        assert_eq!(style("@{}"), Style::default());
        assert_eq!(style("@{ }"), Style::default());
        assert_eq!(parse_tag("@{}rest", 0).unwrap().end, 3);
    }

    #[test]
    fn last_color_wins_decorations_accumulate() {
        let s = style("@{red:bold:#0000aa:underline:bold}");
        assert_eq!(s.color, Some(color::DARK_BLUE));
        assert_eq!(
            s.decorations.members().collect::<Vec<_>>(),
            vec![Decoration::Bold, Decoration::Underlined]
        );
    }

    #[test]
    fn empty_modifiers_are_skipped() {
        assert_eq!(style("@{red::}").color, Some(color::RED));
        assert_eq!(style("@{:}"), Style::default());
    }

    #[test]
    fn blank_modifier_beside_others_is_rejected() {
        let err = parse_tag("@{red: }", 0).unwrap_err();
        let m = err.as_malformed().unwrap();
        assert_eq!(m.message(), "style tag contains an unrecognized modifier ' '");
        assert!(parse_tag("@{ : }", 0).is_err());
    }

    #[test]
    fn missing_close_reports_after_prefix() {
        let err = parse_tag("ab@{red", 2).unwrap_err();
        let m = err.as_malformed().unwrap();
        assert_eq!(m.position(), 4);
        assert_eq!(m.message(), "style tag missing a close brace");
    }

    #[test]
    fn unknown_modifier_reports_tag_position() {
        let err = parse_tag("x @{red:sparkly}y", 2).unwrap_err();
        match err {
            Error::Malformed(m) => {
                assert_eq!(m.position(), 4);
                assert!(m.message().contains("'sparkly'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
