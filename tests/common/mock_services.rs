//! Recording test doubles for the clone orchestrator

use gclone::application::use_cases::{CloneEvent, CloneReporter};
use std::sync::Mutex;

/// Reporter that keeps every event for later inspection
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CloneEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CloneEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<CloneEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, CloneEvent::CloneFailed { .. }))
            .collect()
    }
}

impl CloneReporter for RecordingReporter {
    fn report(&self, event: CloneEvent) {
        self.events.lock().unwrap().push(event);
    }
}
