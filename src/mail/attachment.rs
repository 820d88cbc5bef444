use std::fs;
use std::path::Path;

use mail_parser::{MessageParser, MimeHeaders};

use crate::error::{AppError, AppResult};

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    Text(String),
    Binary(Vec<u8>),
}

impl AttachmentContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttachmentContent::Text(text) => text.as_bytes(),
            AttachmentContent::Binary(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AttachmentContent::Text(_))
    }
}

impl From<String> for AttachmentContent {
    fn from(value: String) -> Self {
        AttachmentContent::Text(value)
    }
}

impl From<&str> for AttachmentContent {
    fn from(value: &str) -> Self {
        AttachmentContent::Text(value.to_string())
    }
}

impl From<Vec<u8>> for AttachmentContent {
    fn from(value: Vec<u8>) -> Self {
        AttachmentContent::Binary(value)
    }
}

impl From<&[u8]> for AttachmentContent {
    fn from(value: &[u8]) -> Self {
        AttachmentContent::Binary(value.to_vec())
    }
}

/// A named payload attached to an outbound message.
///
/// `filename` may be empty and `mimetype` may be absent; renderers fall back
/// to guessing the type from the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: AttachmentContent,
    pub mimetype: Option<String>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<AttachmentContent>,
        mimetype: Option<&str>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            mimetype: mimetype.map(ToOwned::to_owned),
        }
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("invalid attachment path: {}", path.display()))
            })?;
        let guessed = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        // text/* on the wire must decode as UTF-8
        let (content, mimetype) = if is_text_mimetype(Some(&guessed)) {
            match String::from_utf8(data) {
                Ok(text) => (AttachmentContent::Text(text), guessed),
                Err(err) => (
                    AttachmentContent::Binary(err.into_bytes()),
                    OCTET_STREAM.to_string(),
                ),
            }
        } else {
            (AttachmentContent::Binary(data), guessed)
        };

        Ok(Self {
            filename,
            content,
            mimetype: Some(mimetype),
        })
    }

    pub fn is_textual(&self) -> bool {
        is_text_mimetype(self.mimetype.as_deref())
    }

    /// Declared mimetype, or a guess from the filename.
    pub fn effective_mimetype(&self) -> String {
        match self.mimetype.as_deref().map(str::trim) {
            Some(mimetype) if !mimetype.is_empty() => mimetype.to_string(),
            _ => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}

pub fn is_text_mimetype(mimetype: Option<&str>) -> bool {
    mimetype
        .map(|value| value.trim().to_ascii_lowercase().starts_with("text/"))
        .unwrap_or(false)
}

/// A pre-built MIME entity: header list plus the payload exactly as it
/// appears on the wire (still transfer-encoded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    pub headers: Vec<(String, String)>,
    pub payload: Vec<u8>,
}

/// What a [`MimePart`] carries once its headers and transfer encoding are
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPart {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub payload: Vec<u8>,
}

impl MimePart {
    pub fn new(headers: Vec<(String, String)>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            payload: payload.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }

    pub fn decode(&self) -> AppResult<DecodedPart> {
        let raw = self.to_bytes();
        let parsed = MessageParser::default()
            .parse(raw.as_slice())
            .ok_or_else(|| AppError::InvalidInput("unable to parse mime part".to_string()))?;
        let part = parsed
            .parts
            .first()
            .ok_or_else(|| AppError::InvalidInput("mime part has no body".to_string()))?;

        let content_type = self
            .header("Content-Type")
            .and(part.content_type())
            .map(|ct| match ct.subtype() {
                Some(subtype) => format!("{}/{subtype}", ct.ctype()),
                None => ct.ctype().to_string(),
            })
            .map(|essence| essence.to_ascii_lowercase());

        Ok(DecodedPart {
            filename: part
                .attachment_name()
                .map(str::to_string)
                .filter(|name| !name.is_empty()),
            content_type,
            payload: part.contents().to_vec(),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 256);
        if self.header("MIME-Version").is_none() {
            out.extend_from_slice(b"MIME-Version: 1.0\r\n");
        }
        for (name, value) in &self.headers {
            out.extend_from_slice(format!("{}: {}\r\n", name.trim(), value.trim()).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.payload);
        out
    }
}
