use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

use super::attachment::Attachment;
use super::message::{AlternativePart, EmailMessage};

struct Entity {
    headers: Vec<(String, String)>,
    body: EntityBody,
}

enum EntityBody {
    Leaf(String),
    Multipart { boundary: String, parts: Vec<Entity> },
}

/// Renders the message as an RFC 5322 document with CRLF line endings.
pub fn render(message: &EmailMessage) -> String {
    let entity = build_entity(message);
    let is_multipart = matches!(entity.body, EntityBody::Multipart { .. });

    let mut headers = build_base_headers(message);
    headers.extend(entity.headers);
    apply_custom_headers(&mut headers, message, is_multipart);

    let mut out = String::new();
    write_headers(&mut out, &headers);
    out.push_str("\r\n");
    write_body(&mut out, &entity.body);
    out
}

/// URL-safe unpadded base64 of a rendered message, as HTTP mail APIs expect.
pub fn encode_raw(rendered: &str) -> String {
    URL_SAFE_NO_PAD.encode(rendered.as_bytes())
}

/// Value of the `Message-ID` header in a rendered document.
pub fn message_id(rendered: &str) -> Option<&str> {
    rendered
        .split("\r\n\r\n")
        .next()?
        .split("\r\n")
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("Message-ID") {
                Some(value.trim())
            } else {
                None
            }
        })
}

fn build_base_headers(message: &EmailMessage) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    headers.push(("From".to_string(), sanitize_header_value(&message.from_email)));

    if !message.to.is_empty() {
        headers.push(("To".to_string(), join_addresses(&message.to)));
    }

    if !message.cc.is_empty() {
        headers.push(("Cc".to_string(), join_addresses(&message.cc)));
    }

    if !message.reply_to.is_empty() {
        headers.push(("Reply-To".to_string(), join_addresses(&message.reply_to)));
    }

    headers.push(("Subject".to_string(), encode_header_text(&message.subject)));
    headers.push((
        "Message-ID".to_string(),
        random_message_id(&message.from_email),
    ));
    headers.push(("MIME-Version".to_string(), "1.0".to_string()));
    headers
}

fn apply_custom_headers(
    headers: &mut Vec<(String, String)>,
    message: &EmailMessage,
    is_multipart: bool,
) {
    for (name, value) in &message.headers {
        let name = sanitize_header_value(name);
        if name.is_empty() || name.eq_ignore_ascii_case("Bcc") {
            continue;
        }
        // multipart boundaries live in the generated Content-Type
        if is_multipart && name.to_ascii_lowercase().starts_with("content-") {
            continue;
        }

        let value = sanitize_header_value(value);
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => headers.push((name, value)),
        }
    }
}

fn build_entity(message: &EmailMessage) -> Entity {
    let text = Entity {
        headers: vec![(
            "Content-Type".to_string(),
            format!(
                "text/{}; charset=utf-8",
                sanitize_header_value(&message.subtypes.content)
            ),
        )],
        body: EntityBody::Leaf(normalize_newlines(message.body.text())),
    };

    let alternatives = message.body.alternatives();
    let primary = if alternatives.is_empty() {
        text
    } else {
        let mut parts = vec![text];
        parts.extend(alternatives.iter().map(alternative_entity));
        multipart("alternative", parts)
    };

    if message.attachments.is_empty() {
        return primary;
    }

    let mut parts = vec![primary];
    parts.extend(message.attachments.iter().map(attachment_entity));
    multipart(&sanitize_header_value(&message.subtypes.mixed), parts)
}

fn multipart(subtype: &str, parts: Vec<Entity>) -> Entity {
    let boundary = random_boundary();
    Entity {
        headers: vec![(
            "Content-Type".to_string(),
            format!("multipart/{subtype}; boundary=\"{boundary}\""),
        )],
        body: EntityBody::Multipart { boundary, parts },
    }
}

fn alternative_entity(part: &AlternativePart) -> Entity {
    Entity {
        headers: vec![(
            "Content-Type".to_string(),
            format!("{}; charset=utf-8", sanitize_header_value(&part.mimetype)),
        )],
        body: EntityBody::Leaf(normalize_newlines(&part.content)),
    }
}

fn attachment_entity(attachment: &Attachment) -> Entity {
    let mimetype = sanitize_header_value(&attachment.effective_mimetype());
    let filename = escape_header_value(&attachment.filename);

    let mut content_type = mimetype.clone();
    if attachment.is_textual() || mimetype.starts_with("text/") {
        content_type.push_str("; charset=utf-8");
    }

    let disposition = if filename.is_empty() {
        "attachment".to_string()
    } else {
        content_type.push_str(&format!("; name=\"{filename}\""));
        format!("attachment; filename=\"{filename}\"")
    };

    let encoded = STANDARD.encode(attachment.content.as_bytes());
    Entity {
        headers: vec![
            ("Content-Type".to_string(), content_type),
            ("Content-Transfer-Encoding".to_string(), "base64".to_string()),
            ("Content-Disposition".to_string(), disposition),
        ],
        body: EntityBody::Leaf(fold_base64_lines(&encoded)),
    }
}

fn write_headers(out: &mut String, headers: &[(String, String)]) {
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
}

fn write_body(out: &mut String, body: &EntityBody) {
    match body {
        EntityBody::Leaf(content) => {
            out.push_str(content);
            if !content.ends_with("\r\n") {
                out.push_str("\r\n");
            }
        }
        EntityBody::Multipart { boundary, parts } => {
            for part in parts {
                out.push_str(&format!("--{boundary}\r\n"));
                write_headers(out, &part.headers);
                out.push_str("\r\n");
                write_body(out, &part.body);
            }
            out.push_str(&format!("--{boundary}--\r\n"));
        }
    }
}

fn join_addresses(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|value| sanitize_header_value(value))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_header_text(value: &str) -> String {
    let value = sanitize_header_value(value);
    if value.is_ascii() {
        value
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

fn normalize_newlines(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 76 + 8);
    let mut start = 0;
    while start < input.len() {
        let end = (start + 76).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str("\r\n");
        start = end;
    }
    out
}

fn random_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    format!("postbox-{token}")
}

fn random_message_id(from_email: &str) -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    format!("<{token}@{}>", sender_domain(from_email))
}

fn sender_domain(from_email: &str) -> String {
    from_email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>').trim().to_string())
        .filter(|domain| !domain.is_empty() && !domain.contains(char::is_whitespace))
        .unwrap_or_else(|| "localhost".to_string())
}

/// Trims and drops CR/LF so a value cannot start a new header line.
pub fn sanitize_header_value(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|value| *value != '\r' && *value != '\n')
        .collect()
}

/// [`sanitize_header_value`] without double quotes, for quoted parameters
/// and display names.
pub fn escape_header_value(value: &str) -> String {
    sanitize_header_value(value).replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_base64_at_76_columns() {
        let input = "A".repeat(100);
        let folded = fold_base64_lines(&input);
        let lines = folded.split("\r\n").collect::<Vec<_>>();
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 24);
    }

    #[test]
    fn extracts_sender_domain() {
        assert_eq!(sender_domain("Jane <jane@example.org>"), "example.org");
        assert_eq!(sender_domain("nobody"), "localhost");
    }

    #[test]
    fn encodes_non_ascii_subject() {
        assert_eq!(encode_header_text("hello"), "hello");
        assert!(encode_header_text("héllo").starts_with("=?utf-8?b?"));
    }

    #[test]
    fn strips_line_breaks_from_header_values() {
        assert_eq!(sanitize_header_value("a\r\nBcc: x"), "aBcc: x");
    }
}
