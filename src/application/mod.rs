pub mod log_sink;
pub mod notifier;
pub mod progress_filter;
pub mod sequencer;

pub use log_sink::{LogBuffer, SessionEvent};
pub use notifier::CompletionNotifier;
pub use sequencer::{session_events, DownloadSequencer};
