//! Request kinds and their model allow-lists

use crate::core::constants::{models, upstream};
use std::fmt;

/// The two kinds of prompt the proxy forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Chat,
    Image,
}

impl PromptKind {
    /// Segment substituted into the upstream URL template
    pub fn segment(self) -> &'static str {
        match self {
            PromptKind::Chat => upstream::CHAT_SEGMENT,
            PromptKind::Image => upstream::IMAGE_SEGMENT,
        }
    }

    /// Substitute the first placeholder of `template` with this kind's segment
    pub fn url(self, template: &str) -> String {
        template.replacen(upstream::PLACEHOLDER, self.segment(), 1)
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Static allow-lists of model identifiers
pub struct ModelCatalog;

impl ModelCatalog {
    /// Models accepted for the given kind
    pub fn models(kind: PromptKind) -> &'static [&'static str] {
        match kind {
            PromptKind::Chat => models::CHAT,
            PromptKind::Image => models::IMAGE,
        }
    }

    /// Exact, case-sensitive membership check
    pub fn allows(kind: PromptKind, model: &str) -> bool {
        Self::models(kind).contains(&model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_models() {
        assert!(ModelCatalog::allows(PromptKind::Chat, "gpt"));
        assert!(ModelCatalog::allows(PromptKind::Chat, "llama"));
        assert!(ModelCatalog::allows(PromptKind::Chat, "bard"));
        assert!(!ModelCatalog::allows(PromptKind::Chat, "art"));
        assert!(!ModelCatalog::allows(PromptKind::Chat, "GPT"));
        assert!(!ModelCatalog::allows(PromptKind::Chat, ""));
    }

    #[test]
    fn test_image_models() {
        assert!(ModelCatalog::allows(PromptKind::Image, "3d"));
        assert!(ModelCatalog::allows(PromptKind::Image, "photography"));
        assert!(!ModelCatalog::allows(PromptKind::Image, "gpt"));
    }

    #[test]
    fn test_segments() {
        assert_eq!(PromptKind::Chat.segment(), "chat");
        assert_eq!(PromptKind::Image.to_string(), "image");
        assert_eq!(PromptKind::Chat.url("http://up/{}?v=1"), "http://up/chat?v=1");
    }
}
