//! Logging trait for MoneyMitra client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every request passing through the [`MoneyMitra`](crate::MoneyMitra)
//! client, and [`JsonLinesLogger`], which appends those events to a file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};

use crate::error::{Error, Result};

/// A trait for logging MoneyMitra client operations.
///
/// Implementations must not fail: logging problems are swallowed so they can
/// never change the outcome of a request.
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing request. `body` is `None` for GET requests.
    fn log_request(&self, method: &str, url: &str, body: Option<&Value>);

    /// Log a response that was received and decoded.
    fn log_response(&self, url: &str, status: u16, elapsed: Duration, body: &Value);

    /// Log a request that failed, whether in transport, at the backend, or
    /// while decoding.
    fn log_error(&self, url: &str, elapsed: Duration, error: &Error);
}

/// Appends one JSON object per client event to a file.
pub struct JsonLinesLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open client log", err))?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_event(&self, event: Value) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let timestamp = crate::utils::time::now();
        let mut event = event;
        if let (Some(obj), Ok(ts)) = (
            event.as_object_mut(),
            timestamp.format(&time::format_description::well_known::Rfc3339),
        ) {
            obj.insert("ts".to_string(), Value::String(ts));
        }
        let _ = serde_json::to_writer(&mut *writer, &event);
        let _ = writer.write_all(b"\n");
        let _ = writer.flush();
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, method: &str, url: &str, body: Option<&Value>) {
        self.write_event(json!({
            "event": "request",
            "method": method,
            "url": url,
            "body": body,
        }));
    }

    fn log_response(&self, url: &str, status: u16, elapsed: Duration, body: &Value) {
        self.write_event(json!({
            "event": "response",
            "url": url,
            "status": status,
            "elapsed_ms": elapsed.as_millis() as u64,
            "body": body,
        }));
    }

    fn log_error(&self, url: &str, elapsed: Duration, error: &Error) {
        self.write_event(json!({
            "event": "error",
            "url": url,
            "elapsed_ms": elapsed.as_millis() as u64,
            "status": error.status_code(),
            "error": error.to_string(),
        }));
    }
}
