use crate::error::FieldError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Static, non-empty list of message strings. Content is opaque to the
/// field apart from inline glyph markers.
#[derive(Clone, Debug)]
pub struct MessageList {
    messages: Vec<String>,
}

impl MessageList {
    pub fn new<I, S>(messages: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Err(FieldError::NoMessages);
        }
        Ok(Self { messages })
    }

    /// Uniformly random message.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.messages
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}
