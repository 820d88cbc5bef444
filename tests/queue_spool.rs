use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::json;

use postbox::codec::record;
use postbox::mail::{Attachment, EmailMessage, MessageBody};
use postbox::queue::{FlushReport, Spool};
use postbox::transport::{FileTransport, MemoryTransport, Transport};

fn scratch_dir(label: &str) -> PathBuf {
    let token: u64 = rand::thread_rng().r#gen();
    let dir = std::env::temp_dir().join(format!("postbox-{label}-{token:016x}"));
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

fn spool_in(root: &Path) -> Spool {
    Spool::new(root.join("queue"), root.join("dead"))
}

fn message(subject: &str) -> EmailMessage {
    EmailMessage {
        subject: subject.to_string(),
        body: MessageBody::Plain("body".to_string()),
        from_email: "ops@example.com".to_string(),
        to: vec!["a@example.com".to_string()],
        attachments: vec![Attachment::new("f.txt", "hello", Some("text/plain"))],
        ..EmailMessage::default()
    }
}

#[test]
fn enqueue_writes_record_that_decodes_back() {
    let root = scratch_dir("enqueue");
    let spool = spool_in(&root);

    let queued = spool.enqueue(&message("first")).expect("enqueue");
    let raw = fs::read_to_string(&queued.path).expect("record file");

    assert_eq!(record::from_json(&raw).expect("decode"), message("first"));
    assert_eq!(spool.pending().expect("pending"), [queued.path]);

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn flush_sends_in_queue_order_and_removes_records() {
    let root = scratch_dir("flush");
    let spool = spool_in(&root);
    spool.enqueue(&message("first")).expect("enqueue");
    spool.enqueue(&message("second")).expect("enqueue");

    let memory = MemoryTransport::new();
    let report = spool
        .flush(&Transport::Memory(memory.clone()), None)
        .await
        .expect("flush");

    assert_eq!(
        report,
        FlushReport {
            sent: 2,
            dead_lettered: 0,
            deferred: 0
        }
    );
    let subjects = memory
        .sent()
        .expect("outbox")
        .into_iter()
        .map(|sent| sent.subject)
        .collect::<Vec<_>>();
    assert_eq!(subjects, ["first", "second"]);
    assert!(spool.pending().expect("pending").is_empty());

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn flush_respects_limit() {
    let root = scratch_dir("limit");
    let spool = spool_in(&root);
    spool.enqueue(&message("first")).expect("enqueue");
    spool.enqueue(&message("second")).expect("enqueue");

    let memory = MemoryTransport::new();
    let report = spool
        .flush(&Transport::Memory(memory.clone()), Some(1))
        .await
        .expect("flush");

    assert_eq!(report.sent, 1);
    assert_eq!(spool.pending().expect("pending").len(), 1);

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn record_without_attachments_is_dead_lettered() {
    let root = scratch_dir("dead");
    let spool = spool_in(&root);
    let broken = json!({ "subject": "broken", "to": ["a@example.com"] }).to_string();
    let queued = spool.enqueue_raw(&broken).expect("enqueue");

    let memory = MemoryTransport::new();
    let report = spool
        .flush(&Transport::Memory(memory.clone()), None)
        .await
        .expect("flush");

    assert_eq!(report.dead_lettered, 1);
    assert!(memory.sent().expect("outbox").is_empty());
    assert!(spool.pending().expect("pending").is_empty());

    let file_name = queued.path.file_name().expect("file name");
    let moved = spool.dead_letter_dir().join(file_name);
    assert_eq!(fs::read_to_string(moved).expect("dead letter"), broken);

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn latin1_text_file_survives_enqueue_and_flush() {
    let root = scratch_dir("latin1");
    let spool = spool_in(&root);
    let legacy = root.join("legacy.txt");
    fs::write(&legacy, b"caf\xe9").expect("legacy file");

    let mut queued = message("legacy");
    queued.attachments = vec![Attachment::from_path(&legacy).expect("attach")];
    spool.enqueue(&queued).expect("enqueue");

    let memory = MemoryTransport::new();
    let report = spool
        .flush(&Transport::Memory(memory.clone()), None)
        .await
        .expect("flush");

    assert_eq!(
        report,
        FlushReport {
            sent: 1,
            dead_lettered: 0,
            deferred: 0
        }
    );
    let sent = memory.sent().expect("outbox");
    assert_eq!(sent[0].attachments[0].content.as_bytes(), b"caf\xe9");
    assert_eq!(
        sent[0].attachments[0].mimetype.as_deref(),
        Some("application/octet-stream")
    );

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn transport_failure_leaves_record_queued() {
    let root = scratch_dir("deferred");
    let spool = spool_in(&root);
    spool.enqueue(&message("first")).expect("enqueue");

    // a regular file where the transport expects a directory
    let blocked = root.join("not-a-dir");
    fs::write(&blocked, b"").expect("blocker");
    let transport = Transport::File(FileTransport::new(&blocked));

    let report = spool.flush(&transport, None).await.expect("flush");

    assert_eq!(report.deferred, 1);
    assert_eq!(spool.pending().expect("pending").len(), 1);

    fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn file_transport_writes_eml() {
    let root = scratch_dir("eml");
    let outbox = root.join("outbox");
    let transport = Transport::File(FileTransport::new(&outbox));

    let receipt = transport.send(&message("saved")).await.expect("send");
    assert_eq!(receipt.transport, "file");

    let files = fs::read_dir(&outbox)
        .expect("outbox")
        .map(|entry| entry.expect("entry").path())
        .collect::<Vec<_>>();
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].extension().and_then(|value| value.to_str()),
        Some("eml")
    );
    let rendered = fs::read_to_string(&files[0]).expect("eml");
    assert!(rendered.contains("Subject: saved\r\n"));

    fs::remove_dir_all(root).ok();
}
