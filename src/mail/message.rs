use std::collections::BTreeMap;

use super::attachment::Attachment;

pub const DEFAULT_CONTENT_SUBTYPE: &str = "plain";
pub const DEFAULT_MIXED_SUBTYPE: &str = "mixed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativePart {
    pub content: String,
    pub mimetype: String,
}

impl AlternativePart {
    pub fn new(content: impl Into<String>, mimetype: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mimetype: mimetype.into(),
        }
    }
}

/// Primary body, optionally carried alongside alternate renderings.
///
/// `Alternative` with no parts is still a multipart-alternative message and
/// survives a record round trip as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Plain(String),
    Alternative {
        text: String,
        alternatives: Vec<AlternativePart>,
    },
}

impl MessageBody {
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Plain(text) => text,
            MessageBody::Alternative { text, .. } => text,
        }
    }

    pub fn alternatives(&self) -> &[AlternativePart] {
        match self {
            MessageBody::Plain(_) => &[],
            MessageBody::Alternative { alternatives, .. } => alternatives,
        }
    }

    pub fn is_alternative(&self) -> bool {
        matches!(self, MessageBody::Alternative { .. })
    }
}

impl Default for MessageBody {
    fn default() -> Self {
        MessageBody::Plain(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtypes {
    pub content: String,
    pub mixed: String,
}

impl Subtypes {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn content_is_default(&self) -> bool {
        self.content == DEFAULT_CONTENT_SUBTYPE
    }

    pub fn mixed_is_default(&self) -> bool {
        self.mixed == DEFAULT_MIXED_SUBTYPE
    }
}

impl Default for Subtypes {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT_SUBTYPE.to_string(),
            mixed: DEFAULT_MIXED_SUBTYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: MessageBody,
    pub from_email: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Vec<String>,
    pub headers: BTreeMap<String, String>,
    pub attachments: Vec<Attachment>,
    pub subtypes: Subtypes,
}

impl EmailMessage {
    /// Every envelope recipient: to, then cc, then bcc.
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
            .collect()
    }
}
