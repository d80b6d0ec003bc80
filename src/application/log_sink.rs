use std::fmt::Display;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::{AppError, SessionOutcome};

pub const ERROR_PREFIX: &str = "Error: ";

/// Everything a running session reports to the view that owns it.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Log(String),
    Finished(Result<SessionOutcome, AppError>),
}

/// Write end of the session log.
///
/// Cheap to clone and safe to call from any thread: every append is queued
/// to the owning context, which is the only place the text is mutated.
/// Appends never wait for the owner.
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: UnboundedSender<SessionEvent>,
}

pub fn channel() -> (LogSink, UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded();
    (LogSink { tx }, rx)
}

impl LogSink {
    pub fn append(&self, line: impl Into<String>) {
        self.dispatch(SessionEvent::Log(line.into()));
    }

    pub fn error(&self, message: impl Display) {
        self.append(format!("{ERROR_PREFIX}{message}"));
    }

    pub(crate) fn finish(&self, result: Result<SessionOutcome, AppError>) {
        self.dispatch(SessionEvent::Finished(result));
    }

    fn dispatch(&self, event: SessionEvent) {
        if self.tx.unbounded_send(event).is_err() {
            log::debug!("Session log owner is gone, dropping event");
        }
    }
}

/// Owner side of the log: an append-only list of lines.
#[derive(Debug, Default, Clone)]
pub struct LogBuffer {
    lines: Vec<String>,
}

impl LogBuffer {
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn logs(events: Vec<SessionEvent>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Log(line) => Some(line),
                SessionEvent::Finished(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_appends_from_other_threads_arrive_in_order() {
        let (sink, rx) = channel();
        let worker = sink.clone();
        std::thread::spawn(move || {
            for i in 0..50 {
                worker.append(format!("line {i}"));
            }
            worker.error("last");
        })
        .join()
        .unwrap();
        drop(sink);

        let lines = logs(rx.collect().await);
        assert_eq!(lines.len(), 51);
        assert_eq!(lines[0], "line 0");
        assert_eq!(lines[49], "line 49");
        assert_eq!(lines[50], "Error: last");
    }

    #[test]
    fn test_append_after_owner_dropped_is_silent() {
        let (sink, rx) = channel();
        drop(rx);
        sink.append("nobody listens");
    }

    #[test]
    fn test_buffer() {
        let mut buffer = LogBuffer::default();
        assert!(buffer.lines().is_empty());
        buffer.push("a".into());
        buffer.push("b".into());
        assert_eq!(buffer.lines(), ["a".to_string(), "b".to_string()]);
        buffer.clear();
        assert!(buffer.lines().is_empty());
    }
}
