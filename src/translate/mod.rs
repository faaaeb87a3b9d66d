//! Template translation: placeholders, style tags and action tags into
//! [`Segment`]s.
//!
//! ```text
//! ${name} / ${name:default}    placeholder, escaped as $${
//! @{red:bold}                  style for the following run, escaped as @@{
//! #{kind:payload}body{/#}      action around body, escaped as ##{ and {//#}
//! #{text:(hover)}body{/#}      hover sub-template, `)` escaped as \)
//! ```

mod action;
mod escape;
mod placeholder;
mod scanner;
mod style;

pub use escape::{escape, escape_hover, strip_escapes, strip_hover_escapes};

use crate::{
    error::Result,
    message::{Segment, SegmentBuilder},
};
use escape::strip_tag_escapes;
use scanner::{nearest, next_action, next_style};
use bitflags::bitflags;
use std::collections::HashMap;
use tracing::debug;

// Language definition
pub const PLACEHOLDER_PREFIX: &str = "${";
pub const PLACEHOLDER_SUFFIX: &str = "}";
pub const PLACEHOLDER_VALUE_DELIMITER: char = ':';
pub const PLACEHOLDER_ESCAPE: char = '$';

pub const STYLE_PREFIX: &str = "@{";
pub const STYLE_SUFFIX: &str = "}";
pub const STYLE_SEPARATOR: char = ':';
pub const STYLE_ESCAPE: char = '@';

pub const ACTION_PREFIX: &str = "#{";
pub const ACTION_SUFFIX: &str = "}";
pub const ACTION_END: &str = "{/#}";
pub const ACTION_SEPARATOR: char = ':';
pub const ACTION_ESCAPE: char = '#';
pub const ACTION_END_ESCAPE: &str = "{//#}";

pub const HOVER_PREFIX: &str = "(";
pub const HOVER_SUFFIX: &str = ")";
pub const HOVER_ESCAPE: char = '\\';

const ESCAPED_PLACEHOLDER_PREFIX: &str = "$${";
const ESCAPED_STYLE_PREFIX: &str = "@@{";
const ESCAPED_ACTION_PREFIX: &str = "##{";
const ESCAPED_HOVER_SUFFIX: &str = "\\)";

/// Nested action and hover levels allowed before a template is rejected.
pub const MAX_DEPTH: usize = 64;

/// Placeholder values by name.
pub type Vars = HashMap<String, String>;

bitflags! {
    /// Parser switches for a single call. Never inherited by sub-templates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const DISABLE_STYLES  = 0b01;
        const DISABLE_ACTIONS = 0b10;
    }
}

/// Placeholder lookup: per-call values shadow translator defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseContext<'a> {
    defaults: Option<&'a Vars>,
    call: Option<&'a Vars>,
}

impl<'a> ParseContext<'a> {
    pub fn new(defaults: Option<&'a Vars>, call: Option<&'a Vars>) -> Self {
        Self { defaults, call }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.call
            .and_then(|vars| vars.get(name))
            .or_else(|| self.defaults.and_then(|vars| vars.get(name)))
            .map(String::as_str)
    }
}

/// Translates templates into segments. Holds only the default placeholder
/// context, so one instance can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Translator {
    defaults: Vars,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A translator whose `defaults` fill placeholders missing from a call.
    pub fn with_defaults(defaults: Vars) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Vars {
        &self.defaults
    }

    pub fn parse(&self, template: &str) -> Result<Vec<Segment>> {
        self.parse_flags(template, None, Flags::empty())
    }

    pub fn parse_with(&self, template: &str, vars: &Vars) -> Result<Vec<Segment>> {
        self.parse_flags(template, Some(vars), Flags::empty())
    }

    /// Substitute placeholders, then resolve tags.
    pub fn parse_flags(&self, template: &str, vars: Option<&Vars>, flags: Flags) -> Result<Vec<Segment>> {
        let context = ParseContext::new(Some(&self.defaults), vars);
        let source = placeholder::substitute(template.trim(), &context)?;
        debug!(len = source.len(), ?flags, "translating template");
        Parser::default().parse(&source, flags, &|builder| builder)
    }

    /// Resolve tags without placeholder substitution; `${...}` stays
    /// verbatim. Useful for validating templates whose context is unknown.
    pub fn parse_raw(&self, template: &str, flags: Flags) -> Result<Vec<Segment>> {
        Parser::default().parse(template.trim(), flags, &|builder| builder)
    }
}

/// Applied to every builder a parse produces, after the parser's own setup.
type Finish<'f> = dyn Fn(SegmentBuilder) -> SegmentBuilder + 'f;

/// One level of the recursive tag parser.
#[derive(Clone, Copy, Debug, Default)]
struct Parser {
    depth: usize,
}

impl Parser {
    fn nested(self) -> Parser {
        Parser {
            depth: self.depth + 1,
        }
    }

    /// `source` is already trimmed; whitespace left at its ends came from
    /// placeholder values and is kept.
    fn parse(self, source: &str, flags: Flags, finish: &Finish<'_>) -> Result<Vec<Segment>> {
        let plain = |text: &str| finish(Segment::builder().content(strip_tag_escapes(text))).build();

        if source.trim().is_empty() {
            return Ok(vec![plain("")]);
        }

        let styles = !flags.contains(Flags::DISABLE_STYLES);
        let actions = !flags.contains(Flags::DISABLE_ACTIONS);
        let scan = |from: usize| {
            (
                if styles { next_style(source, from) } else { None },
                if actions { next_action(source, from) } else { None },
            )
        };

        let (mut style_at, mut action_at) = scan(0);
        let Some(first) = nearest(style_at, action_at) else {
            return Ok(vec![plain(source)]);
        };

        let mut segments = Vec::new();
        if first > 0 {
            segments.push(plain(&source[..first]));
        }

        loop {
            match (style_at, action_at) {
                (Some(open), next) if next.is_none_or(|a| open < a) => {
                    let tag = style::parse_tag(source, open)?;
                    (style_at, action_at) = scan(tag.end);
                    let run_end = nearest(style_at, action_at).unwrap_or(source.len());

                    let builder = Segment::builder().content(strip_tag_escapes(&source[tag.end..run_end]));
                    segments.push(finish(tag.style.apply(builder)).build());
                }
                (_, Some(open)) => {
                    let tag = self.action(source, open, finish)?;
                    segments.extend(tag.segments);
                    (style_at, action_at) = scan(tag.end);

                    // Text between the end marker and the next tag (or the end).
                    let gap_end = nearest(style_at, action_at).unwrap_or(source.len());
                    if gap_end > tag.end {
                        segments.push(plain(&source[tag.end..gap_end]));
                    }
                }
                _ => break,
            }
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        message::{ClickAction, Decoration, HoverAction, color},
    };

    fn vars(pairs: &[(&str, &str)]) -> Vars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn parse(template: &str) -> Vec<Segment> {
        Translator::new().parse(template).unwrap()
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(parse("Hello, World!"), vec![Segment::text("Hello, World!")]);
    }

    #[test]
    fn blank_is_single_empty_segment() {
        assert_eq!(parse("   "), vec![Segment::text("")]);
        assert_eq!(parse(""), vec![Segment::text("")]);
    }

    #[test]
    fn template_is_trimmed() {
        assert_eq!(parse("  hi  "), vec![Segment::text("hi")]);
    }

    #[test]
    fn text_before_first_tag() {
        assert_eq!(
            parse("Hello@{#51d51d}, @{bold:underline}World!"),
            vec![
                Segment::text("Hello"),
                Segment::builder()
                    .content(", ")
                    .color(color::Color::rgb(0x51d51d))
                    .build(),
                Segment::builder()
                    .content("World!")
                    .decorate(Decoration::Bold)
                    .decorate(Decoration::Underlined)
                    .build(),
            ]
        );
    }

    #[test]
    fn reset_drops_style() {
        assert_eq!(
            parse("@{red}Hello, @{}World!"),
            vec![
                Segment::builder().content("Hello, ").color(color::RED).build(),
                Segment::text("World!"),
            ]
        );
    }

    #[test]
    fn disable_styles_keeps_tags_verbatim() {
        let out = Translator::new()
            .parse_flags("@{red}hi", None, Flags::DISABLE_STYLES)
            .unwrap();
        assert_eq!(out, vec![Segment::text("@{red}hi")]);
    }

    #[test]
    fn disable_actions_keeps_tags_verbatim() {
        let out = Translator::new()
            .parse_flags("#{link:x}hi{/#}", None, Flags::DISABLE_ACTIONS)
            .unwrap();
        assert_eq!(out, vec![Segment::text("#{link:x}hi{/#}")]);
    }

    #[test]
    fn flags_combine() {
        let both = Flags::DISABLE_STYLES | Flags::DISABLE_ACTIONS;
        assert!(both.contains(Flags::DISABLE_STYLES));
        assert!(both.contains(Flags::DISABLE_ACTIONS));
        assert!(!Flags::DISABLE_STYLES.contains(Flags::DISABLE_ACTIONS));
    }

    #[test]
    fn flags_stop_at_the_action_body() {
        let out = Translator::new()
            .parse_flags("#{link:x}@{red}y{/#}", None, Flags::DISABLE_STYLES)
            .unwrap();
        assert_eq!(
            out,
            vec![Segment::builder()
                .content("y")
                .color(color::RED)
                .click(ClickAction::OpenUrl("x".into()))
                .build()]
        );
    }

    #[test]
    fn placeholder_whitespace_survives() {
        let pad = vars(&[("pad", "  ")]);
        let translator = Translator::new();
        assert_eq!(
            translator.parse_with("${pad}Hi", &pad).unwrap(),
            vec![Segment::text("  Hi")]
        );
        assert_eq!(
            translator.parse_with("Hi${pad}", &pad).unwrap(),
            vec![Segment::text("Hi  ")]
        );
        assert_eq!(
            translator.parse_with(" ${pad} ", &pad).unwrap(),
            vec![Segment::text("")]
        );
    }

    #[test]
    fn malformed_reports_untrimmed_substitution() {
        let err = Translator::new()
            .parse_with("${pad}@{red", &vars(&[("pad", "  ")]))
            .unwrap_err();
        let m = err.as_malformed().unwrap();
        assert_eq!(m.template(), "  @{red");
        assert_eq!(m.position(), 4);
    }

    #[test]
    fn defaults_fill_missing_placeholders() {
        let translator = Translator::with_defaults(vars(&[("who", "World"), ("site", "x")]));
        assert_eq!(
            translator.parse_with("Hi ${who} at ${site}", &vars(&[("site", "y")])).unwrap(),
            vec![Segment::text("Hi World at y")]
        );
    }

    #[test]
    fn undefined_placeholder_aborts() {
        assert!(matches!(
            Translator::new().parse("Hello, ${hello}!"),
            Err(Error::UndefinedPlaceholder { .. })
        ));
    }

    #[test]
    fn placeholder_values_can_carry_tags() {
        assert_eq!(
            Translator::new()
                .parse_with("${warn}", &vars(&[("warn", "@{red}careful")]))
                .unwrap(),
            vec![Segment::builder().content("careful").color(color::RED).build()]
        );
    }

    #[test]
    fn raw_parse_leaves_placeholders() {
        assert_eq!(
            Translator::new().parse_raw("@{gold}${coins}", Flags::empty()).unwrap(),
            vec![Segment::builder().content("${coins}").color(color::GOLD).build()]
        );
    }

    #[test]
    fn text_between_actions_is_kept() {
        assert_eq!(
            parse("#{link:a}x{/#} and #{link:b}y{/#}"),
            vec![
                Segment::builder()
                    .content("x")
                    .click(ClickAction::OpenUrl("a".into()))
                    .build(),
                Segment::text(" and "),
                Segment::builder()
                    .content("y")
                    .click(ClickAction::OpenUrl("b".into()))
                    .build(),
            ]
        );
    }

    #[test]
    fn style_after_action() {
        assert_eq!(
            parse("#{page:2}next{/#} @{gray}(page 2)"),
            vec![
                Segment::builder()
                    .content("next")
                    .click(ClickAction::ChangePage(2))
                    .build(),
                Segment::text(" "),
                Segment::builder().content("(page 2)").color(color::GRAY).build(),
            ]
        );
    }

    #[test]
    fn hover_disables_actions_inside() {
        let out = parse("#{text:(#{link:x}y{/#})}z{/#}");
        let hover = HoverAction::show_text(vec![Segment::text("#{link:x}y{/#}")]);
        assert_eq!(out, vec![Segment::builder().content("z").hover(hover).build()]);
    }
}
