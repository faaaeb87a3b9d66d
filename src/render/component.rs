//! Rich-text component tree built from segments.

use crate::message::{ClickAction, Color, Decoration, HoverAction, Segment};

/// Tri-state decoration flag. Segment components never leave a decoration
/// `NotSet`, so nothing leaks in from a parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecorationState {
    #[default]
    NotSet,
    Off,
    On,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Component {
    text: String,
    color: Option<Color>,
    decorations: [DecorationState; Decoration::ALL.len()],
    click: Option<ClickAction>,
    hover: Option<Box<Component>>,
    children: Vec<Component>,
}

impl Component {
    /// A root holding one child per segment.
    pub fn from_segments(segments: &[Segment]) -> Component {
        Component {
            children: segments.iter().map(Component::from_segment).collect(),
            ..Component::default()
        }
    }

    /// Color, then decorations, then click, then hover.
    pub fn from_segment(segment: &Segment) -> Component {
        let mut component = Component {
            text: segment.content().to_owned(),
            ..Component::default()
        };

        component.color = segment.color();

        component.decorations = [DecorationState::Off; Decoration::ALL.len()];
        for decoration in segment.decorations().members() {
            component.decorations[decoration as usize] = DecorationState::On;
        }

        component.click = segment.click().cloned();

        component.hover = segment.hover().map(|hover| match hover {
            HoverAction::ShowText(text) => Box::new(Component::from_segments(text)),
        });

        component
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn decoration(&self, decoration: Decoration) -> DecorationState {
        self.decorations[decoration as usize]
    }

    pub fn click(&self) -> Option<&ClickAction> {
        self.click.as_ref()
    }

    pub fn hover(&self) -> Option<&Component> {
        self.hover.as_deref()
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Text of this node and its descendants, depth-first.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::color;

    #[test]
    fn absent_decorations_are_forced_off() {
        let seg = Segment::builder()
            .content("x")
            .decorate(Decoration::Italic)
            .build();
        let c = Component::from_segment(&seg);
        assert_eq!(c.decoration(Decoration::Italic), DecorationState::On);
        for d in [
            Decoration::Obfuscated,
            Decoration::Bold,
            Decoration::Strikethrough,
            Decoration::Underlined,
        ] {
            assert_eq!(c.decoration(d), DecorationState::Off);
        }
    }

    #[test]
    fn root_leaves_decorations_unset() {
        let root = Component::from_segments(&[Segment::text("a"), Segment::text("b")]);
        assert_eq!(root.decoration(Decoration::Bold), DecorationState::NotSet);
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.plain_text(), "ab");
    }

    #[test]
    fn hover_becomes_nested_tree() {
        let hover = HoverAction::show_text(vec![
            Segment::builder().content("tip").color(color::AQUA).build(),
        ]);
        let seg = Segment::builder()
            .content("x")
            .hover(hover)
            .click(ClickAction::RunCommand("/help".into()))
            .build();
        let c = Component::from_segment(&seg);
        let tip = c.hover().unwrap();
        assert_eq!(tip.plain_text(), "tip");
        assert_eq!(tip.children()[0].color(), Some(color::AQUA));
        assert_eq!(c.click(), Some(&ClickAction::RunCommand("/help".into())));
    }
}
