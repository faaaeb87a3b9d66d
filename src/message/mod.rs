//! Resolved message segments — the translator's output model.

pub mod color;

pub use color::Color;

use crate::error::{Error, Result};
use bitflags::bitflags;

/// Text decorations a segment may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Decoration {
    Obfuscated,
    Bold,
    Strikethrough,
    Underlined,
    Italic,
}

impl Decoration {
    pub const ALL: [Decoration; 5] = [
        Decoration::Obfuscated,
        Decoration::Bold,
        Decoration::Strikethrough,
        Decoration::Underlined,
        Decoration::Italic,
    ];

    /// Match a style modifier name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "obfuscate" | "obfuscated" | "matrix" => Some(Self::Obfuscated),
            "bold" => Some(Self::Bold),
            "strikethrough" | "strike" => Some(Self::Strikethrough),
            "underline" | "underlined" => Some(Self::Underlined),
            "italic" | "italics" => Some(Self::Italic),
            _ => None,
        }
    }

    /// The single-member set holding `self`.
    pub fn flag(self) -> Decorations {
        match self {
            Decoration::Obfuscated => Decorations::OBFUSCATED,
            Decoration::Bold => Decorations::BOLD,
            Decoration::Strikethrough => Decorations::STRIKETHROUGH,
            Decoration::Underlined => Decorations::UNDERLINED,
            Decoration::Italic => Decorations::ITALIC,
        }
    }
}

bitflags! {
    /// A set of [`Decoration`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Decorations: u8 {
        const OBFUSCATED    = 0b0_0001;
        const BOLD          = 0b0_0010;
        const STRIKETHROUGH = 0b0_0100;
        const UNDERLINED    = 0b0_1000;
        const ITALIC        = 0b1_0000;
    }
}

impl Decorations {
    /// Members in declaration order.
    pub fn members(self) -> impl Iterator<Item = Decoration> {
        Decoration::ALL
            .into_iter()
            .filter(move |d| self.contains(d.flag()))
    }

    pub fn len(self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Decorations::empty()
    }
}

impl From<Decoration> for Decorations {
    fn from(decoration: Decoration) -> Self {
        decoration.flag()
    }
}

impl FromIterator<Decoration> for Decorations {
    fn from_iter<I: IntoIterator<Item = Decoration>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Decorations::empty(), |set, d| set | d.flag())
    }
}

/// Keyword families recognized in the kind position of an action tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickKind {
    ChangePage,
    CopyToClipboard,
    OpenFile,
    OpenUrl,
    RunCommand,
    SuggestCommand,
}

impl ClickKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "change-page" | "change_page" | "page" => Some(Self::ChangePage),
            "copy-to-clipboard" | "copy_to_clipboard" | "copy" | "clipboard" => {
                Some(Self::CopyToClipboard)
            }
            "open-file" | "open_file" | "file" => Some(Self::OpenFile),
            "open-url" | "open_url" | "url" | "link" => Some(Self::OpenUrl),
            "run-command" | "run_command" | "command" | "run" => Some(Self::RunCommand),
            "suggest-command" | "suggest_command" | "suggest" => Some(Self::SuggestCommand),
            _ => None,
        }
    }
}

/// What happens when a segment is clicked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClickAction {
    ChangePage(i32),
    CopyToClipboard(String),
    OpenFile(String),
    OpenUrl(String),
    RunCommand(String),
    SuggestCommand(String),
}

impl ClickAction {
    pub fn kind(&self) -> ClickKind {
        match self {
            ClickAction::ChangePage(_) => ClickKind::ChangePage,
            ClickAction::CopyToClipboard(_) => ClickKind::CopyToClipboard,
            ClickAction::OpenFile(_) => ClickKind::OpenFile,
            ClickAction::OpenUrl(_) => ClickKind::OpenUrl,
            ClickAction::RunCommand(_) => ClickKind::RunCommand,
            ClickAction::SuggestCommand(_) => ClickKind::SuggestCommand,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverKind {
    ShowText,
    ShowEntity,
    ShowItem,
}

impl HoverKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "text" | "show-text" | "show_text" => Some(Self::ShowText),
            "entity" | "show-entity" | "show_entity" => Some(Self::ShowEntity),
            "item" | "show-item" | "show_item" => Some(Self::ShowItem),
            _ => None,
        }
    }
}

/// What is shown when a segment is hovered.
///
/// Entity and item hovers are recognized keywords without a representation;
/// their constructors always fail.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverAction {
    ShowText(Vec<Segment>),
}

impl HoverAction {
    pub fn show_text(text: Vec<Segment>) -> Self {
        HoverAction::ShowText(text)
    }

    pub fn show_entity(_params: &str) -> Result<Self> {
        Err(Error::Unsupported {
            feature: "show-entity hover",
        })
    }

    pub fn show_item(_params: &str) -> Result<Self> {
        Err(Error::Unsupported {
            feature: "show-item hover",
        })
    }

    pub fn kind(&self) -> HoverKind {
        match self {
            HoverAction::ShowText(_) => HoverKind::ShowText,
        }
    }
}

/// One run of text sharing a color, decorations and actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Segment {
    content: String,
    color: Option<Color>,
    decorations: Decorations,
    click: Option<ClickAction>,
    hover: Option<HoverAction>,
}

impl Segment {
    pub fn builder() -> SegmentBuilder {
        SegmentBuilder::default()
    }

    /// An unstyled segment.
    pub fn text(content: impl Into<String>) -> Self {
        Self::builder().content(content).build()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn decorations(&self) -> Decorations {
        self.decorations
    }

    pub fn click(&self) -> Option<&ClickAction> {
        self.click.as_ref()
    }

    pub fn hover(&self) -> Option<&HoverAction> {
        self.hover.as_ref()
    }
}

/// Staging area for a [`Segment`]; frozen by [`SegmentBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct SegmentBuilder {
    inner: Segment,
}

impl SegmentBuilder {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.inner.content = content.into();
        self
    }

    /// Content staged so far.
    pub fn staged_content(&self) -> &str {
        &self.inner.content
    }

    /// Later calls overwrite earlier ones.
    pub fn color(mut self, color: Color) -> Self {
        self.inner.color = Some(color);
        self
    }

    pub fn decorate(mut self, decoration: Decoration) -> Self {
        self.inner.decorations.insert(decoration.flag());
        self
    }

    pub fn decorations(mut self, decorations: Decorations) -> Self {
        self.inner.decorations = self.inner.decorations.union(decorations);
        self
    }

    pub fn click(mut self, click: ClickAction) -> Self {
        self.inner.click = Some(click);
        self
    }

    pub fn hover(mut self, hover: HoverAction) -> Self {
        self.inner.hover = Some(hover);
        self
    }

    pub fn build(self) -> Segment {
        self.inner
    }
}
