use std::sync::Arc;

use serde::Serialize;

use super::registry::SessionRegistry;
use crate::domain::ports::{Notifier, Signal};

#[derive(Debug, Serialize)]
struct Frame {
    event: &'static str,
    data: bool,
}

/// Wire form of a signal: `{"event":"joined","data":true}`.
pub fn frame(signal: Signal) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Frame {
        event: signal.event_name(),
        data: true,
    })
}

/// Pushes signals onto the outbound queue of every relevant connection.
/// Never blocks; a queue whose socket is gone is dropped from the registry.
pub struct RealtimeDispatcher {
    registry: Arc<SessionRegistry>,
}

impl RealtimeDispatcher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}

impl Notifier for RealtimeDispatcher {
    fn notify(&self, claim_id: i32, signal: Signal) {
        for (id, tx) in self.registry.recipients(claim_id) {
            if tx.send(signal).is_err() {
                log::warn!(
                    "Dropping '{}' for claim {}: connection {} is closed",
                    signal.event_name(),
                    claim_id,
                    id
                );
                self.registry.unregister(id);
            }
        }
    }
}
