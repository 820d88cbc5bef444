use std::collections::BTreeMap;

use serde_json::json;

use postbox::codec::attachment::{self, WireAttachment};
use postbox::codec::record::{self, MessageRecord, WireAlternative};
use postbox::error::AppError;
use postbox::mail::{
    AlternativePart, Attachment, AttachmentContent, EmailMessage, MessageBody, MimePart, Subtypes,
};

fn greeting() -> EmailMessage {
    EmailMessage {
        subject: "Hi".to_string(),
        body: MessageBody::Plain("Hello".to_string()),
        from_email: "ops@example.com".to_string(),
        to: vec!["a@x.com".to_string()],
        attachments: vec![Attachment::new("f.txt", "hello", Some("text/plain"))],
        ..EmailMessage::default()
    }
}

#[test]
fn serializes_text_attachment_as_base64_tuple() {
    let stored = record::serialize(&greeting());

    assert_eq!(
        stored.attachments,
        [WireAttachment(
            "f.txt".to_string(),
            "aGVsbG8=".to_string(),
            Some("text/plain".to_string())
        )]
    );

    let restored = record::deserialize(&stored).expect("deserialize");
    assert_eq!(
        restored.attachments[0].content,
        AttachmentContent::Text("hello".to_string())
    );
}

#[test]
fn wire_shape_uses_flat_keys_and_tuple_arrays() {
    let value = record::to_value(&greeting()).expect("to value");

    assert_eq!(
        value,
        json!({
            "subject": "Hi",
            "body": "Hello",
            "from_email": "ops@example.com",
            "to": ["a@x.com"],
            "bcc": [],
            "cc": [],
            "reply_to": [],
            "headers": {},
            "attachments": [["f.txt", "aGVsbG8=", "text/plain"]]
        })
    );
}

#[test]
fn plain_message_round_trips() {
    let message = EmailMessage {
        cc: vec!["b@x.com".to_string()],
        bcc: vec!["c@x.com".to_string()],
        reply_to: vec!["desk@x.com".to_string()],
        headers: BTreeMap::from([("X-Campaign".to_string(), "spring".to_string())]),
        attachments: vec![
            Attachment::new("f.txt", "hello", Some("text/plain")),
            Attachment::new(
                "logo.png",
                vec![0x89_u8, b'P', b'N', b'G', 0, 255],
                Some("image/png"),
            ),
            Attachment::new("", vec![7_u8; 3], None),
        ],
        ..greeting()
    };

    let restored = record::deserialize(&record::serialize(&message)).expect("deserialize");

    assert!(!restored.body.is_alternative());
    assert_eq!(restored, message);
}

#[test]
fn alternative_message_round_trips_as_alternative() {
    let message = EmailMessage {
        body: MessageBody::Alternative {
            text: "Hello".to_string(),
            alternatives: vec![
                AlternativePart::new("<p>Hello</p>", "text/html"),
                AlternativePart::new("# Hello", "text/markdown"),
            ],
        },
        ..greeting()
    };

    let stored = record::serialize(&message);
    assert_eq!(
        stored.alternatives,
        Some(vec![
            WireAlternative("<p>Hello</p>".to_string(), "text/html".to_string()),
            WireAlternative("# Hello".to_string(), "text/markdown".to_string()),
        ])
    );

    let restored = record::deserialize(&stored).expect("deserialize");
    assert!(restored.body.is_alternative());
    assert_eq!(restored.body.alternatives(), message.body.alternatives());
    assert_eq!(restored, message);
}

#[test]
fn empty_alternative_list_keeps_alternative_kind() {
    let message = EmailMessage {
        body: MessageBody::Alternative {
            text: "Hello".to_string(),
            alternatives: vec![],
        },
        ..greeting()
    };

    let value = record::to_value(&message).expect("to value");
    assert_eq!(value["alternatives"], json!([]));

    let restored = record::from_value(&value).expect("from value");
    assert!(restored.body.is_alternative());
}

#[test]
fn carries_only_non_default_subtypes() {
    let message = EmailMessage {
        subtypes: Subtypes::with_content("html"),
        ..greeting()
    };

    let value = record::to_value(&message).expect("to value");
    assert_eq!(value["content_subtype"], json!("html"));
    assert!(value.get("mixed_subtype").is_none());

    let restored = record::from_value(&value).expect("from value");
    assert_eq!(restored.subtypes.content, "html");
    assert_eq!(restored.subtypes.mixed, "mixed");
}

#[test]
fn missing_attachments_key_is_a_lookup_failure() {
    let value = json!({
        "subject": "Hi",
        "body": "Hello",
        "to": ["a@x.com"]
    });

    match record::from_value(&value) {
        Err(AppError::MissingField(field)) => assert_eq!(field, "attachments"),
        other => panic!("expected missing field error, got {other:?}"),
    }
}

#[test]
fn repeated_deserialization_sees_the_same_record() {
    let mut message = greeting();
    message.subtypes = Subtypes {
        content: "html".to_string(),
        mixed: "related".to_string(),
    };
    let value = record::to_value(&message).expect("to value");
    let snapshot = value.clone();

    let first = record::from_value(&value).expect("first attempt");
    let second = record::from_value(&value).expect("retry");

    assert_eq!(first, second);
    assert_eq!(value, snapshot);
}

#[test]
fn retry_after_failed_attempt_sees_original_shape() {
    let stored: MessageRecord = serde_json::from_value(json!({
        "subject": "Hi",
        "to": ["a@x.com"],
        "attachments": [["bad.txt", "not base64!", "text/plain"]],
        "content_subtype": "html"
    }))
    .expect("record shape");
    let snapshot = stored.clone();

    assert!(record::deserialize(&stored).is_err());
    assert!(record::deserialize(&stored).is_err());
    assert_eq!(stored, snapshot);
    assert_eq!(stored.content_subtype.as_deref(), Some("html"));
}

#[test]
fn rejects_legacy_blob_attachments() {
    let raw = r#"{"subject":"Hi","attachments":["gASVKAAAAAAAAACMBWYudHh0lC4="]}"#;

    assert!(matches!(record::from_json(raw), Err(AppError::Record(_))));
}

#[test]
fn binary_attachment_round_trips() {
    let original = Attachment::new(
        "blob.bin",
        vec![0_u8, 159, 146, 150, 255],
        Some("application/octet-stream"),
    );
    let restored = attachment::decode(&attachment::encode(&original)).expect("decode");
    assert_eq!(restored, original);
}

#[test]
fn text_attachment_round_trips_to_same_string() {
    let original = Attachment::new("notes.csv", "a,b\nç,ü\n", Some("text/csv"));
    let restored = attachment::decode(&attachment::encode(&original)).expect("decode");
    assert_eq!(
        restored.content,
        AttachmentContent::Text("a,b\nç,ü\n".to_string())
    );
}

#[test]
fn encodes_structured_mime_part() {
    let part = MimePart::new(
        vec![
            (
                "Content-Type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                "Content-Disposition".to_string(),
                "attachment; filename=\"readme.txt\"".to_string(),
            ),
            (
                "Content-Transfer-Encoding".to_string(),
                "quoted-printable".to_string(),
            ),
        ],
        b"na=C3=AFve".to_vec(),
    );

    let wire = attachment::encode_part(&part).expect("encode part");
    assert_eq!(wire.filename(), "readme.txt");
    assert_eq!(wire.mimetype(), Some("text/plain"));

    let restored = Attachment::try_from(&part).expect("decode part");
    assert_eq!(restored.content, AttachmentContent::Text("naïve".to_string()));
}

#[test]
fn encodes_part_with_quoted_and_extended_filenames() {
    let quoted = MimePart::new(
        vec![
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                "attachment; filename=\"q1; final.pdf\"".to_string(),
            ),
        ],
        b"%PDF".to_vec(),
    );
    assert_eq!(
        attachment::encode_part(&quoted).expect("quoted").filename(),
        "q1; final.pdf"
    );

    let extended = MimePart::new(
        vec![
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                "attachment; filename*=utf-8''na%C3%AFve.pdf".to_string(),
            ),
        ],
        b"%PDF".to_vec(),
    );
    assert_eq!(
        attachment::encode_part(&extended).expect("extended").filename(),
        "naïve.pdf"
    );
}
