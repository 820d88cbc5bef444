use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::mail::attachment::{Attachment, AttachmentContent, MimePart, is_text_mimetype};

/// `[filename, base64 content, mimetype]` as stored in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAttachment(pub String, pub String, pub Option<String>);

impl WireAttachment {
    pub fn filename(&self) -> &str {
        &self.0
    }

    pub fn content(&self) -> &str {
        &self.1
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.2.as_deref()
    }
}

pub fn encode(attachment: &Attachment) -> WireAttachment {
    WireAttachment(
        attachment.filename.clone(),
        STANDARD.encode(attachment.content.as_bytes()),
        attachment.mimetype.clone(),
    )
}

/// Encodes a structured MIME part, undoing its transfer encoding first.
pub fn encode_part(part: &MimePart) -> AppResult<WireAttachment> {
    let decoded = part.decode()?;
    Ok(WireAttachment(
        decoded.filename.unwrap_or_default(),
        STANDARD.encode(decoded.payload),
        decoded.content_type,
    ))
}

pub fn decode(wire: &WireAttachment) -> AppResult<Attachment> {
    let bytes = STANDARD.decode(wire.content().trim())?;
    let content = if is_text_mimetype(wire.mimetype()) {
        AttachmentContent::Text(String::from_utf8(bytes)?)
    } else {
        AttachmentContent::Binary(bytes)
    };

    Ok(Attachment {
        filename: wire.filename().to_string(),
        content,
        mimetype: wire.2.clone(),
    })
}

impl TryFrom<&MimePart> for Attachment {
    type Error = crate::error::AppError;

    fn try_from(part: &MimePart) -> Result<Self, Self::Error> {
        decode(&encode_part(part)?)
    }
}
