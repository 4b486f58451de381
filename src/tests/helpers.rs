//! Test helper utilities shared across unit test modules.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::core_types::{ClientFailure, CloudFailure, ErrorKind, ServiceFailure};
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

/// Service failure with a code and message, as AWS returns for a 400.
pub fn service_failure(code: &str, message: &str) -> ServiceFailure {
    ServiceFailure::new(400, ErrorKind::Client)
        .with_code(code)
        .with_message(message)
}

/// Service failure carrying only an error code.
pub fn coded_failure(code: &str) -> CloudFailure {
    CloudFailure::Service(ServiceFailure::new(400, ErrorKind::Client).with_code(code))
}

/// Service failure with neither code nor message, as a bare gateway error.
pub fn bare_failure(status_code: u16, error_kind: ErrorKind) -> CloudFailure {
    CloudFailure::Service(ServiceFailure::new(status_code, error_kind))
}

pub fn client_failure(message: &str) -> CloudFailure {
    CloudFailure::Client(ClientFailure::new().with_message(message))
}

/// Layer that records the level of every event it sees.
#[derive(Clone, Default)]
pub struct LevelRecorder {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl LevelRecorder {
    pub fn count(&self, level: Level) -> usize {
        self.levels
            .lock()
            .map(|levels| levels.iter().filter(|l| **l == level).count())
            .unwrap_or(0)
    }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Ok(mut levels) = self.levels.lock() {
            levels.push(*event.metadata().level());
        }
    }
}

/// Run `f` with a scoped subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LevelRecorder) {
    let recorder = LevelRecorder::default();
    let subscriber = Registry::default().with(recorder.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, recorder)
}
