use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::mail::{AlternativePart, Attachment, EmailMessage, MessageBody, Subtypes};
use crate::transport::{SendReceipt, Transport};

pub const HTML_SUBTYPE: &str = "html";

/// Arguments of a one-shot HTML send.
///
/// `alternative` is a loose key/value map so callers can forward whatever
/// they were handed; it must carry both `content` and `mimetype`.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub reply_to: Option<Vec<String>>,
    pub bcc: Option<Vec<String>>,
    pub attachments: Option<Vec<Attachment>>,
    pub alternative: Option<BTreeMap<String, String>>,
}

pub fn build_message(mail: OutgoingMail, settings: &Settings) -> AppResult<EmailMessage> {
    let alternatives = match mail.alternative {
        Some(alternative) => vec![parse_alternative(alternative)?],
        None => Vec::new(),
    };

    Ok(EmailMessage {
        subject: mail.subject,
        body: MessageBody::Alternative {
            text: mail.body,
            alternatives,
        },
        from_email: settings.from_address(),
        to: mail.recipients,
        cc: Vec::new(),
        bcc: mail.bcc.unwrap_or_default(),
        reply_to: mail.reply_to.unwrap_or_default(),
        headers: BTreeMap::new(),
        attachments: mail.attachments.unwrap_or_default(),
        subtypes: Subtypes::with_content(HTML_SUBTYPE),
    })
}

pub async fn send_mail(
    mail: OutgoingMail,
    settings: &Settings,
    transport: &Transport,
) -> AppResult<SendReceipt> {
    let message = build_message(mail, settings)?;
    debug!(
        subject = %message.subject,
        attachments = message.attachments.len(),
        alternatives = message.body.alternatives().len(),
        "dispatching message"
    );
    transport.send(&message).await
}

fn parse_alternative(mut alternative: BTreeMap<String, String>) -> AppResult<AlternativePart> {
    let content = alternative.remove("content");
    let mimetype = alternative.remove("mimetype");

    match (content, mimetype) {
        (Some(content), Some(mimetype)) => Ok(AlternativePart { content, mimetype }),
        (None, _) => Err(AppError::InvalidAlternative(
            "missing `content` key".to_string(),
        )),
        (_, None) => Err(AppError::InvalidAlternative(
            "missing `mimetype` key".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternative_requires_both_keys() {
        let only_content = BTreeMap::from([("content".to_string(), "<p>x</p>".to_string())]);
        let error = parse_alternative(only_content).unwrap_err();
        assert!(error.to_string().contains("mimetype"));

        let only_type = BTreeMap::from([("mimetype".to_string(), "text/html".to_string())]);
        let error = parse_alternative(only_type).unwrap_err();
        assert!(error.to_string().contains("content"));
    }

    #[test]
    fn extra_alternative_keys_are_ignored() {
        let alternative = BTreeMap::from([
            ("content".to_string(), "<p>x</p>".to_string()),
            ("mimetype".to_string(), "text/html".to_string()),
            ("charset".to_string(), "utf-8".to_string()),
        ]);
        let part = parse_alternative(alternative).unwrap();
        assert_eq!(part, AlternativePart::new("<p>x</p>", "text/html"));
    }
}
