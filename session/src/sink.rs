//! Routing of relay and peer callbacks back into the event loop.

use crate::controller::SessionEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Which channel instance produced an event. Each relay connection and each
/// peer session gets a fresh generation number, so events from an instance
/// that has since been torn down can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Relay(u64),
    Peer(u64),
}

#[derive(Debug)]
pub struct Tagged {
    pub source: Source,
    pub event: SessionEvent,
}

/// Cloneable handle that callbacks use to report events.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<Tagged>,
    source: Source,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<Tagged>, source: Source) -> Self {
        Self { tx, source }
    }

    pub fn emit(&self, event: SessionEvent) {
        // The loop only goes away on shutdown; late events are irrelevant then.
        let _ = self.tx.send(Tagged {
            source: self.source,
            event,
        });
    }
}
