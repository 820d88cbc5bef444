use std::collections::BTreeMap;
use std::fs;

use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::markdown::markdown_to_html;
use crate::send::{OutgoingMail, send_mail};

use super::compose::{read_attachments, read_body};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let mail = build_outgoing(args)?;
    let transport = ctx.transport()?;
    let receipt = send_mail(mail, &ctx.settings, &transport).await?;

    let text = format!("sent message {} via {}", receipt.id, receipt.transport);
    ctx.output.emit(&text, &receipt)
}

fn build_outgoing(args: SendArgs) -> AppResult<OutgoingMail> {
    if args.to.is_empty() {
        return Err(AppError::InvalidInput("--to is required".to_string()));
    }

    let subject = args
        .subject
        .ok_or_else(|| AppError::InvalidInput("--subject is required".to_string()))?;

    let mut body = read_body(&args.body)?;
    if args.markdown {
        body = markdown_to_html(&subject, &body);
    }

    let alternative = match (args.alternative_file, args.alternative_type) {
        (Some(path), mimetype) => {
            let mut alternative = BTreeMap::new();
            alternative.insert("content".to_string(), fs::read_to_string(path)?);
            if let Some(mimetype) = mimetype {
                alternative.insert("mimetype".to_string(), mimetype);
            }
            Some(alternative)
        }
        (None, Some(_)) => {
            return Err(AppError::InvalidInput(
                "--alternative-type needs --alternative-file".to_string(),
            ));
        }
        (None, None) => None,
    };

    let attachments = read_attachments(&args.attach)?;

    Ok(OutgoingMail {
        subject,
        body,
        recipients: args.to,
        reply_to: non_empty(args.reply_to),
        bcc: non_empty(args.bcc),
        attachments: non_empty(attachments),
        alternative,
    })
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}
