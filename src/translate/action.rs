//! `#{kind:payload}body{/#}` action tags and their hover sub-templates.

use super::{
    ACTION_END, ACTION_PREFIX, ACTION_SEPARATOR, ACTION_SUFFIX, Finish, Flags, HOVER_ESCAPE,
    HOVER_PREFIX, HOVER_SUFFIX, MAX_DEPTH, Parser,
    escape::strip_hover_escapes,
    scanner::{find_action_end, find_from, find_unescaped},
};
use crate::{
    error::{Malformed, Result},
    message::{ClickAction, ClickKind, HoverAction, HoverKind, Segment},
};
use tracing::trace;

/// Segments produced by one action tag; `end` is the first byte after `{/#}`.
#[derive(Debug)]
pub(super) struct ActionTag {
    pub segments: Vec<Segment>,
    pub end: usize,
}

impl Parser {
    /// Parse the action tag opening at `open`, including its body.
    pub(super) fn action(self, source: &str, open: usize, finish: &Finish<'_>) -> Result<ActionTag> {
        let start = open + ACTION_PREFIX.len();
        if self.depth >= MAX_DEPTH {
            return Err(Malformed::new(
                source,
                start,
                format!("tags nested deeper than {MAX_DEPTH} levels"),
            )
            .into());
        }

        // Hover content only counts when it opens inside the tag header.
        let header_end = find_from(source, ACTION_SUFFIX, start);
        let hover_open = find_from(source, HOVER_PREFIX, start)
            .filter(|at| header_end.is_some_and(|end| *at < end));
        let hover_close = hover_open.and_then(|at| {
            find_unescaped(source, HOVER_SUFFIX, at + HOVER_PREFIX.len(), HOVER_ESCAPE)
        });

        let close = find_from(
            source,
            ACTION_SUFFIX,
            hover_close.map_or(start, |at| at + HOVER_SUFFIX.len()),
        )
        .ok_or_else(|| Malformed::new(source, start, "action tag missing a close brace"))?;

        let body_start = close + ACTION_SUFFIX.len();
        let end = find_action_end(source, body_start).ok_or_else(|| {
            Malformed::new(source, body_start, "action tag is missing an end branch")
        })?;

        let (kind, payload) = source[start..close]
            .split_once(ACTION_SEPARATOR)
            .filter(|(kind, payload)| !kind.is_empty() && !payload.is_empty())
            .ok_or_else(|| Malformed::new(source, start, "action tag is missing parameters"))?;

        let click = ClickKind::from_keyword(kind)
            .map(|click| click_action(click, payload, source, start))
            .transpose()?;

        let hover = match HoverKind::from_keyword(kind) {
            None => None,
            Some(HoverKind::ShowText) => {
                let hover_open = hover_open.ok_or_else(|| {
                    Malformed::new(source, start, "action tag is missing hover parenthesis open")
                })?;
                let hover_close = hover_close.ok_or_else(|| {
                    Malformed::new(source, start, "action tag is missing hover parenthesis close")
                })?;
                let after_hover = hover_close + HOVER_SUFFIX.len();
                if after_hover != close {
                    return Err(Malformed::new(
                        source,
                        after_hover,
                        format!(
                            "action tag must end immediately after hover parenthesis close, expected '{ACTION_SUFFIX}' got '{}'",
                            &source[after_hover..close]
                        ),
                    )
                    .into());
                }

                let text = self.nested().parse(
                    source[hover_open + HOVER_PREFIX.len()..hover_close].trim(),
                    Flags::DISABLE_ACTIONS,
                    &|builder| {
                        let content = strip_hover_escapes(builder.staged_content());
                        builder.content(content)
                    },
                )?;
                Some(HoverAction::show_text(text))
            }
            Some(HoverKind::ShowEntity) => Some(HoverAction::show_entity(payload)?),
            Some(HoverKind::ShowItem) => Some(HoverAction::show_item(payload)?),
        };

        trace!(at = open, kind, has_click = click.is_some(), has_hover = hover.is_some(), "action tag");

        let segments = self.nested().parse(source[body_start..end].trim(), Flags::empty(), &|builder| {
            let mut builder = finish(builder);
            if let Some(click) = &click {
                builder = builder.click(click.clone());
            }
            if let Some(hover) = &hover {
                builder = builder.hover(hover.clone());
            }
            builder
        })?;

        Ok(ActionTag {
            segments,
            end: end + ACTION_END.len(),
        })
    }
}

fn click_action(kind: ClickKind, payload: &str, source: &str, start: usize) -> Result<ClickAction> {
    let payload = payload.to_owned();
    Ok(match kind {
        ClickKind::ChangePage => {
            let page = payload.parse::<i32>().map_err(|e| {
                Malformed::new(
                    source,
                    start,
                    format!("unrecognized number in page change '{payload}'"),
                )
                .caused_by(e)
            })?;
            ClickAction::ChangePage(page)
        }
        ClickKind::CopyToClipboard => ClickAction::CopyToClipboard(payload),
        ClickKind::OpenFile => ClickAction::OpenFile(payload),
        ClickKind::OpenUrl => ClickAction::OpenUrl(payload),
        ClickKind::RunCommand => ClickAction::RunCommand(payload),
        ClickKind::SuggestCommand => ClickAction::SuggestCommand(payload),
    })
}
