pub mod console;
pub mod file;
pub mod http;
pub mod memory;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{AppPaths, Settings, TransportKind};
use crate::error::{AppError, AppResult};
use crate::mail::{EmailMessage, mime};

pub use console::ConsoleTransport;
pub use file::FileTransport;
pub use http::HttpTransport;
pub use memory::MemoryTransport;

#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub id: String,
    pub transport: &'static str,
    pub recipients: usize,
    pub note: String,
}

#[derive(Debug, Clone)]
pub enum Transport {
    Console(ConsoleTransport),
    File(FileTransport),
    Memory(MemoryTransport),
    Http(HttpTransport),
}

impl Transport {
    pub fn from_settings(settings: &Settings, paths: &AppPaths, profile: &str) -> AppResult<Self> {
        let transport = match settings.transport {
            TransportKind::Console => Transport::Console(ConsoleTransport),
            TransportKind::File => {
                let dir = settings
                    .file_dir
                    .clone()
                    .unwrap_or_else(|| paths.outbox_dir(profile));
                Transport::File(FileTransport::new(dir))
            }
            TransportKind::Http => Transport::Http(HttpTransport::new(
                settings.api_base_url(),
                settings.access_token()?,
            )),
        };

        debug!(transport = transport.kind(), "transport selected");
        Ok(transport)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Transport::Console(_) => "console",
            Transport::File(_) => "file",
            Transport::Memory(_) => "memory",
            Transport::Http(_) => "http",
        }
    }

    /// Delivers one message. Failures propagate unchanged; nothing is retried.
    pub async fn send(&self, message: &EmailMessage) -> AppResult<SendReceipt> {
        let recipients = message.recipients().len();
        if recipients == 0 {
            return Err(AppError::InvalidInput(
                "message has no recipients".to_string(),
            ));
        }

        let rendered = mime::render(message);
        let message_id = mime::message_id(&rendered)
            .unwrap_or_default()
            .to_string();

        let (id, note) = match self {
            Transport::Console(console) => {
                console.deliver(&rendered)?;
                (message_id, "message written to stdout".to_string())
            }
            Transport::File(file) => {
                let path = file.deliver(&rendered)?;
                (message_id, format!("message written to {}", path.display()))
            }
            Transport::Memory(memory) => {
                let position = memory.deliver(message)?;
                (message_id, format!("message stored in outbox slot {position}"))
            }
            Transport::Http(http) => {
                let raw = mime::encode_raw(&rendered);
                let delivery = http.deliver(&raw).await?;
                let note = match delivery.thread_id {
                    Some(thread_id) => format!("message accepted by mail api (thread {thread_id})"),
                    None => "message accepted by mail api".to_string(),
                };
                (delivery.id, note)
            }
        };

        info!(transport = self.kind(), id = %id, recipients, "message sent");
        Ok(SendReceipt {
            id,
            transport: self.kind(),
            recipients,
            note,
        })
    }
}
