use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::RecordArgs;
use crate::codec::record;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::{AttachmentContent, EmailMessage};

use super::compose::read_record;

#[derive(Debug, Serialize)]
struct MessageSummary {
    subject: String,
    from: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Vec<String>,
    headers: BTreeMap<String, String>,
    kind: &'static str,
    content_subtype: String,
    mixed_subtype: String,
    body_bytes: usize,
    alternatives: Vec<PartSummary>,
    attachments: Vec<AttachmentSummary>,
}

#[derive(Debug, Serialize)]
struct PartSummary {
    mimetype: String,
    bytes: usize,
}

#[derive(Debug, Serialize)]
struct AttachmentSummary {
    filename: String,
    mimetype: Option<String>,
    bytes: usize,
    text: bool,
}

pub fn run(ctx: &AppContext, args: RecordArgs) -> AppResult<()> {
    let message = record::from_json(&read_record(&args.record)?)?;
    let summary = summarize(&message);

    ctx.output.emit_lines(&summary_lines(&summary), &summary)
}

fn summarize(message: &EmailMessage) -> MessageSummary {
    MessageSummary {
        subject: message.subject.clone(),
        from: message.from_email.clone(),
        to: message.to.clone(),
        cc: message.cc.clone(),
        bcc: message.bcc.clone(),
        reply_to: message.reply_to.clone(),
        headers: message.headers.clone(),
        kind: if message.body.is_alternative() {
            "alternative"
        } else {
            "plain"
        },
        content_subtype: message.subtypes.content.clone(),
        mixed_subtype: message.subtypes.mixed.clone(),
        body_bytes: message.body.text().len(),
        alternatives: message
            .body
            .alternatives()
            .iter()
            .map(|part| PartSummary {
                mimetype: part.mimetype.clone(),
                bytes: part.content.len(),
            })
            .collect(),
        attachments: message
            .attachments
            .iter()
            .map(|attachment| AttachmentSummary {
                filename: attachment.filename.clone(),
                mimetype: attachment.mimetype.clone(),
                bytes: attachment.content.len(),
                text: matches!(attachment.content, AttachmentContent::Text(_)),
            })
            .collect(),
    }
}

fn summary_lines(summary: &MessageSummary) -> Vec<String> {
    let subject = if summary.subject.is_empty() {
        "(no subject)"
    } else {
        summary.subject.as_str()
    };

    let mut lines = vec![
        format!("subject: {subject}"),
        format!("from: {}", summary.from),
        format!("to: {}", summary.to.join(", ")),
    ];
    if !summary.cc.is_empty() {
        lines.push(format!("cc: {}", summary.cc.join(", ")));
    }
    if !summary.bcc.is_empty() {
        lines.push(format!("bcc: {}", summary.bcc.join(", ")));
    }
    if !summary.reply_to.is_empty() {
        lines.push(format!("reply-to: {}", summary.reply_to.join(", ")));
    }
    for (name, value) in &summary.headers {
        lines.push(format!("header: {name}: {value}"));
    }

    lines.push(format!(
        "body: {} ({} bytes, text/{})",
        summary.kind, summary.body_bytes, summary.content_subtype
    ));
    for part in &summary.alternatives {
        lines.push(format!("alternative: {} ({} bytes)", part.mimetype, part.bytes));
    }
    for attachment in &summary.attachments {
        let name = if attachment.filename.is_empty() {
            "(unnamed)"
        } else {
            attachment.filename.as_str()
        };
        let mimetype = attachment.mimetype.as_deref().unwrap_or("(none)");
        let kind = if attachment.text { "text" } else { "binary" };
        lines.push(format!(
            "attachment: {name} {mimetype} {kind} ({} bytes)",
            attachment.bytes
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{AlternativePart, Attachment, MessageBody};

    #[test]
    fn summarizes_alternative_message() {
        let message = EmailMessage {
            subject: String::new(),
            body: MessageBody::Alternative {
                text: "hi".to_string(),
                alternatives: vec![AlternativePart::new("<p>hi</p>", "text/html")],
            },
            from_email: "ops@example.com".to_string(),
            to: vec!["a@example.com".to_string()],
            attachments: vec![Attachment::new("", vec![1_u8, 2, 3], None)],
            ..EmailMessage::default()
        };

        let lines = summary_lines(&summarize(&message));
        assert_eq!(lines[0], "subject: (no subject)");
        assert!(lines.contains(&"body: alternative (2 bytes, text/plain)".to_string()));
        assert!(lines.contains(&"alternative: text/html (9 bytes)".to_string()));
        assert!(lines.contains(&"attachment: (unnamed) (none) binary (3 bytes)".to_string()));
    }
}
