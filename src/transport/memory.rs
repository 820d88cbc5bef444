use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{AppError, AppResult};
use crate::mail::EmailMessage;

/// In-process outbox. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&self, message: &EmailMessage) -> AppResult<usize> {
        let mut outbox = self.outbox()?;
        outbox.push(message.clone());
        Ok(outbox.len())
    }

    pub fn sent(&self) -> AppResult<Vec<EmailMessage>> {
        Ok(self.outbox()?.clone())
    }

    fn outbox(&self) -> AppResult<MutexGuard<'_, Vec<EmailMessage>>> {
        self.outbox
            .lock()
            .map_err(|_| AppError::Transport("memory outbox lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn poisoned_outbox_fails_reads_and_writes_alike() {
        let memory = MemoryTransport::new();
        let shared = memory.clone();
        let _ = thread::spawn(move || {
            let _guard = shared.outbox.lock().unwrap();
            panic!("poison the outbox");
        })
        .join();

        assert!(matches!(memory.sent(), Err(AppError::Transport(_))));
        assert!(matches!(
            memory.deliver(&EmailMessage::default()),
            Err(AppError::Transport(_))
        ));
    }
}
