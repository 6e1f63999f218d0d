//! Typed engine event bus.
//!
//! All engine callbacks enqueue into one unbounded channel that the UI loop
//! drains. The channel is used synchronously; no async runtime is required.
//! View events are delivered only for tabs that are currently subscribed, so
//! a late signal from a closed tab can never reach tab state.

use std::collections::HashSet;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use super::{DownloadEvent, EngineEvent, ViewEvent};
use crate::types::tab::TabId;

/// Untagged sender for profile-level events; also mints per-tab sinks.
#[derive(Debug, Clone)]
pub struct EngineSink {
    tx: UnboundedSender<EngineEvent>,
}

impl EngineSink {
    pub fn download(&self, event: DownloadEvent) {
        // A closed receiver means the shell is shutting down.
        let _ = self.tx.send(EngineEvent::Download(event));
    }

    pub fn for_tab(&self, tab: TabId) -> ViewEventSink {
        ViewEventSink {
            tab,
            tx: self.tx.clone(),
        }
    }
}

/// Sender owned by one content view; every event carries the view's tab id.
#[derive(Debug, Clone)]
pub struct ViewEventSink {
    tab: TabId,
    tx: UnboundedSender<EngineEvent>,
}

impl ViewEventSink {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn emit(&self, event: ViewEvent) {
        let _ = self.tx.send(EngineEvent::View {
            tab: self.tab,
            event,
        });
    }
}

pub struct EventBus {
    tx: UnboundedSender<EngineEvent>,
    rx: UnboundedReceiver<EngineEvent>,
    subscribed: HashSet<TabId>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            subscribed: HashSet::new(),
        }
    }

    pub fn sink(&self) -> EngineSink {
        EngineSink {
            tx: self.tx.clone(),
        }
    }

    /// Starts delivering view events for `tab` and returns the sink its view emits through.
    pub fn subscribe(&mut self, tab: TabId) -> ViewEventSink {
        self.subscribed.insert(tab);
        self.sink().for_tab(tab)
    }

    /// Re-enables delivery for a tab whose view already holds a sink.
    pub fn resubscribe(&mut self, tab: TabId) {
        self.subscribed.insert(tab);
    }

    pub fn unsubscribe(&mut self, tab: TabId) {
        self.subscribed.remove(&tab);
    }

    pub fn is_subscribed(&self, tab: TabId) -> bool {
        self.subscribed.contains(&tab)
    }

    /// Next deliverable event, skipping view events from unsubscribed tabs.
    pub fn try_next(&mut self) -> Option<EngineEvent> {
        loop {
            let event = self.rx.try_recv().ok()?;
            if let EngineEvent::View { tab, event: view_event } = &event {
                if !self.subscribed.contains(tab) {
                    debug!(%tab, ?view_event, "dropping event from unsubscribed tab");
                    continue;
                }
            }
            trace!(?event, "engine event");
            return Some(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
