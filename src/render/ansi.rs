//! ANSI terminal output for a component tree.
//!
//! Colors use 24-bit SGR. Open-url clicks become OSC 8 hyperlinks; other
//! clicks and hovers have no terminal form and are dropped.

use super::component::{Component, DecorationState};
use crate::message::{ClickAction, Color, Decoration};
use std::fmt::Write;

const RESET: &str = "\x1b[0m";

/// Effective style after inheritance.
#[derive(Clone, Copy, Default)]
struct Pen {
    color: Option<Color>,
    decorations: [bool; Decoration::ALL.len()],
}

impl Pen {
    fn overlay(mut self, component: &Component) -> Pen {
        if let Some(color) = component.color() {
            self.color = Some(color);
        }
        for decoration in Decoration::ALL {
            match component.decoration(decoration) {
                DecorationState::On => self.decorations[decoration as usize] = true,
                DecorationState::Off => self.decorations[decoration as usize] = false,
                DecorationState::NotSet => {}
            }
        }
        self
    }

    fn write_sgr(&self, out: &mut String) {
        out.push_str(RESET);
        if let Some(c) = self.color {
            let _ = write!(out, "\x1b[38;2;{};{};{}m", c.red(), c.green(), c.blue());
        }
        for decoration in Decoration::ALL {
            if self.decorations[decoration as usize] {
                let _ = write!(out, "\x1b[{}m", sgr_code(decoration));
            }
        }
    }
}

fn sgr_code(decoration: Decoration) -> u8 {
    match decoration {
        // No terminal has scrambled glyphs; blink is the closest.
        Decoration::Obfuscated => 5,
        Decoration::Bold => 1,
        Decoration::Strikethrough => 9,
        Decoration::Underlined => 4,
        Decoration::Italic => 3,
    }
}

/// Render `component` and its children as an ANSI-styled string.
pub fn to_ansi(component: &Component) -> String {
    let mut out = String::new();
    write_node(component, Pen::default(), &mut out);
    if !out.is_empty() {
        out.push_str(RESET);
    }
    out
}

fn write_node(component: &Component, parent: Pen, out: &mut String) {
    let pen = parent.overlay(component);

    if !component.text().is_empty() {
        pen.write_sgr(out);
        match component.click() {
            Some(ClickAction::OpenUrl(url)) => {
                let _ = write!(out, "\x1b]8;;{url}\x1b\\{}\x1b]8;;\x1b\\", component.text());
            }
            _ => out.push_str(component.text()),
        }
    }

    for child in component.children() {
        write_node(child, pen, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Translator;

    fn ansi(template: &str) -> String {
        let segments = Translator::new().parse(template).unwrap();
        to_ansi(&Component::from_segments(&segments))
    }

    #[test]
    fn plain_text_only_resets() {
        assert_eq!(ansi("hi"), "\x1b[0mhi\x1b[0m");
    }

    #[test]
    fn color_and_decorations() {
        assert_eq!(
            ansi("@{red:bold}x"),
            "\x1b[0m\x1b[38;2;255;85;85m\x1b[1mx\x1b[0m"
        );
    }

    #[test]
    fn decorations_do_not_leak_between_segments() {
        assert_eq!(ansi("@{bold}a@{}b"), "\x1b[0m\x1b[1ma\x1b[0mb\x1b[0m");
    }

    #[test]
    fn links_become_hyperlinks() {
        assert_eq!(
            ansi("#{link:https://e.x}go{/#}"),
            "\x1b[0m\x1b]8;;https://e.x\x1b\\go\x1b]8;;\x1b\\\x1b[0m"
        );
    }

    #[test]
    fn empty_output_for_empty_template() {
        assert_eq!(ansi(""), "");
    }
}
