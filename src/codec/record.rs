use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attachment::{self, WireAttachment};
use crate::error::{AppError, AppResult};
use crate::mail::message::{
    AlternativePart, DEFAULT_CONTENT_SUBTYPE, DEFAULT_MIXED_SUBTYPE, EmailMessage, MessageBody,
    Subtypes,
};

/// `[content, mimetype]` as stored in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAlternative(pub String, pub String);

/// Flat, JSON-compatible form of an [`EmailMessage`].
///
/// `attachments` has no default: a record without it is rejected rather
/// than read as attachment-free. `alternatives` doubles as the tag that
/// selects a multipart-alternative body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub reply_to: Vec<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub attachments: Vec<WireAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<WireAlternative>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_subtype: Option<String>,
}

pub fn serialize(message: &EmailMessage) -> MessageRecord {
    let alternatives = match &message.body {
        MessageBody::Plain(_) => None,
        MessageBody::Alternative { alternatives, .. } => Some(
            alternatives
                .iter()
                .map(|part| WireAlternative(part.content.clone(), part.mimetype.clone()))
                .collect(),
        ),
    };

    MessageRecord {
        subject: message.subject.clone(),
        body: message.body.text().to_string(),
        from_email: message.from_email.clone(),
        to: message.to.clone(),
        bcc: message.bcc.clone(),
        cc: message.cc.clone(),
        reply_to: message.reply_to.clone(),
        headers: message.headers.clone(),
        attachments: message.attachments.iter().map(attachment::encode).collect(),
        alternatives,
        content_subtype: (!message.subtypes.content_is_default())
            .then(|| message.subtypes.content.clone()),
        mixed_subtype: (!message.subtypes.mixed_is_default())
            .then(|| message.subtypes.mixed.clone()),
    }
}

/// Rebuilds a message from a borrowed record; the record is left untouched,
/// so a failed attempt can be retried against the same value.
pub fn deserialize(record: &MessageRecord) -> AppResult<EmailMessage> {
    let attachments = record
        .attachments
        .iter()
        .map(attachment::decode)
        .collect::<AppResult<Vec<_>>>()?;

    let body = match &record.alternatives {
        None => MessageBody::Plain(record.body.clone()),
        Some(parts) => MessageBody::Alternative {
            text: record.body.clone(),
            alternatives: parts
                .iter()
                .map(|WireAlternative(content, mimetype)| {
                    AlternativePart::new(content.clone(), mimetype.clone())
                })
                .collect(),
        },
    };

    let subtypes = Subtypes {
        content: record
            .content_subtype
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_SUBTYPE.to_string()),
        mixed: record
            .mixed_subtype
            .clone()
            .unwrap_or_else(|| DEFAULT_MIXED_SUBTYPE.to_string()),
    };

    Ok(EmailMessage {
        subject: record.subject.clone(),
        body,
        from_email: record.from_email.clone(),
        to: record.to.clone(),
        cc: record.cc.clone(),
        bcc: record.bcc.clone(),
        reply_to: record.reply_to.clone(),
        headers: record.headers.clone(),
        attachments,
        subtypes,
    })
}

pub fn to_value(message: &EmailMessage) -> AppResult<Value> {
    Ok(serde_json::to_value(serialize(message))?)
}

pub fn to_json(message: &EmailMessage) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(&serialize(message))?)
}

pub fn parse_record(value: &Value) -> AppResult<MessageRecord> {
    let Some(object) = value.as_object() else {
        return Err(AppError::Record("record must be a JSON object".to_string()));
    };

    if !object.contains_key("attachments") {
        return Err(AppError::MissingField("attachments"));
    }

    MessageRecord::deserialize(value).map_err(|err| AppError::Record(err.to_string()))
}

pub fn from_value(value: &Value) -> AppResult<EmailMessage> {
    deserialize(&parse_record(value)?)
}

pub fn from_json(raw: &str) -> AppResult<EmailMessage> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| AppError::Record(err.to_string()))?;
    from_value(&value)
}
