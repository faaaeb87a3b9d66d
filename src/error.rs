//! Errors raised while translating a template.

use std::num::ParseIntError;
use thiserror::Error;

/// Marker spliced into [`Malformed`] displays at the failing offset.
const HERE: &str = "<here>";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The template breaks the tag grammar.
    #[error(transparent)]
    Malformed(#[from] Malformed),

    #[error("undefined placeholder '{name}'")]
    UndefinedPlaceholder { name: String },

    #[error("placeholder '{name}' expands back into itself")]
    CyclicPlaceholder { name: String },

    /// A recognized construct that has no implementation (entity and item hovers).
    #[error("{feature} is not supported")]
    Unsupported { feature: &'static str },
}

/// A template that could not be parsed, with enough context to point the
/// author at the exact spot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("improperly formatted message: {message}; source: {}", mark(.template, .offset))]
pub struct Malformed {
    template: String,
    offset: usize,
    position: usize,
    message: String,
    #[source]
    cause: Option<ParseIntError>,
}

impl Malformed {
    /// `offset` is a byte offset into `template` and must fall on a char boundary.
    pub fn new(template: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(template.len());
        Self {
            template: template.to_owned(),
            position: template[..offset].chars().count(),
            offset,
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn caused_by(mut self, cause: ParseIntError) -> Self {
        self.cause = Some(cause);
        self
    }

    /// The source text that failed, after placeholder substitution.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Character offset of the failure.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset of the failure.
    pub fn byte_offset(&self) -> usize {
        self.offset
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The template with `<here>` inserted at the failing offset.
    pub fn marked(&self) -> String {
        mark(&self.template, &self.offset)
    }
}

fn mark(template: &str, offset: &usize) -> String {
    let (head, tail) = template.split_at(*offset);
    let mut out = String::with_capacity(template.len() + HERE.len());
    out.push_str(head);
    out.push_str(HERE);
    out.push_str(tail);
    out
}

impl Error {
    /// The malformed-template details, if this is a grammar error.
    pub fn as_malformed(&self) -> Option<&Malformed> {
        match self {
            Error::Malformed(m) => Some(m),
            _ => None,
        }
    }
}
