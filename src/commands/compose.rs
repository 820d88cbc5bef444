use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};

use crate::cli::{BodyArgs, ComposeArgs};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::mail::{AlternativePart, Attachment, EmailMessage, MessageBody, Subtypes};

pub fn compose_message(settings: &Settings, args: ComposeArgs) -> AppResult<EmailMessage> {
    if args.to.is_empty() && args.cc.is_empty() && args.bcc.is_empty() {
        return Err(AppError::InvalidInput(
            "pass at least one of --to, --cc or --bcc".to_string(),
        ));
    }

    let text = read_body(&args.body)?;
    let body = match &args.alternative_file {
        Some(path) => MessageBody::Alternative {
            text,
            alternatives: vec![AlternativePart::new(
                fs::read_to_string(path)?,
                args.alternative_type.clone(),
            )],
        },
        None => MessageBody::Plain(text),
    };

    let mut headers = BTreeMap::new();
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        headers.insert(name, value);
    }

    let defaults = Subtypes::default();
    let subtypes = Subtypes {
        content: non_blank(args.content_subtype).unwrap_or(defaults.content),
        mixed: non_blank(args.mixed_subtype).unwrap_or(defaults.mixed),
    };

    Ok(EmailMessage {
        subject: args.subject.unwrap_or_default(),
        body,
        from_email: non_blank(args.from).unwrap_or_else(|| settings.from_address()),
        to: args.to,
        cc: args.cc,
        bcc: args.bcc,
        reply_to: args.reply_to,
        headers,
        attachments: read_attachments(&args.attach)?,
        subtypes,
    })
}

pub fn read_body(args: &BodyArgs) -> AppResult<String> {
    let selected = [args.body.is_some(), args.body_file.is_some(), args.stdin]
        .into_iter()
        .filter(|value| *value)
        .count();

    if selected == 0 {
        return Err(AppError::InvalidInput(
            "missing body source; pass one of --body, --body-file, or --stdin".to_string(),
        ));
    }

    if selected > 1 {
        return Err(AppError::InvalidInput(
            "pass only one body source: --body, --body-file, or --stdin".to_string(),
        ));
    }

    if let Some(body) = &args.body {
        return Ok(body.clone());
    }

    if let Some(path) = &args.body_file {
        return Ok(fs::read_to_string(path)?);
    }

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;
    Ok(body)
}

pub fn read_attachments(paths: &[std::path::PathBuf]) -> AppResult<Vec<Attachment>> {
    paths
        .iter()
        .map(|path| Attachment::from_path(path))
        .collect()
}

/// Reads a wire record from a path, or from stdin when `source` is `-`.
pub fn read_record(source: &str) -> AppResult<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }

    Ok(fs::read_to_string(source)?)
}

fn parse_header(raw: &str) -> AppResult<(String, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(AppError::InvalidInput(format!(
            "invalid header `{raw}`; expected NAME=VALUE"
        )));
    };

    let name = name.trim();
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|value| value.is_ascii_graphic() && value != ':');
    if !valid_name {
        return Err(AppError::InvalidInput(format!(
            "invalid header name `{name}`"
        )));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
