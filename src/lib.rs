//! `tagtext` — styled message templates.
//!
//! A template mixes plain text with placeholders (`${name}`), style tags
//! (`@{red:bold}`) and action tags (`#{link:https://…}text{/#}`). The
//! [`Translator`] resolves a template into immutable [`Segment`]s; the
//! [`render`] module maps those onto a component tree and ANSI output, and
//! [`catalog`] serves templates from TOML files.

pub mod catalog;
pub mod error;
pub mod message;
pub mod render;
pub mod translate;

pub use catalog::Catalog;
pub use error::{Error, Malformed, Result};
pub use message::{
    ClickAction, ClickKind, Color, Decoration, Decorations, HoverAction, HoverKind, Segment,
    SegmentBuilder,
};
pub use translate::{Flags, ParseContext, Translator, Vars, escape, escape_hover};
