use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::{future, stream, Stream, StreamExt};

use crate::{
    domain::{model::selected, AppError, Item, ItemOutcome, ItemResult, MediaFormat, SessionOutcome},
    tools::{CommandInvocation, LineHandlers, ProcessRunner, ToolConfig},
    utils::get_timestamp,
};

use super::log_sink::{self, LogSink, SessionEvent};
use super::progress_filter::ProgressFilter;

/// Runs selected items through the downloader one at a time.
pub struct DownloadSequencer<R> {
    runner: R,
    tools: ToolConfig,
    active: AtomicBool,
}

/// Clears the active flag however the run ends, including when its future is dropped.
struct ActiveGuard<'a>(&'a AtomicBool);

impl<'a> ActiveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: ProcessRunner> DownloadSequencer<R> {
    pub fn new(runner: R, tools: ToolConfig) -> Self {
        Self {
            runner,
            tools,
            active: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Downloads every selected item of `items` in order. A second call while
    /// one is in flight is rejected and leaves the first untouched.
    pub async fn run(
        &self,
        items: &[Item],
        format: MediaFormat,
        destination: &Path,
        sink: &LogSink,
    ) -> Result<SessionOutcome, AppError> {
        let Some(_guard) = ActiveGuard::acquire(&self.active) else {
            log::warn!("Rejected session start while another session is running");
            sink.append(AppError::SessionActive.to_string());
            return Err(AppError::SessionActive);
        };

        let queue = selected(items);
        if queue.is_empty() {
            sink.append(AppError::NothingSelected.to_string());
            return Err(AppError::NothingSelected);
        }

        log::info!(
            "Starting {} session: {} item(s) into {}",
            format.label(),
            queue.len(),
            destination.display()
        );

        let total = queue.len();
        let mut results = Vec::with_capacity(total);
        for (index, item) in queue.into_iter().enumerate() {
            sink.append(format!("Starting download ({}/{}): {}", index + 1, total, item.title));
            let result = self.download_item(&item, format, destination, sink).await;
            if let ItemResult::Failed(reason) = &result {
                log::warn!("Item {} failed: {reason}", item.source_url);
            }
            results.push(ItemOutcome { item, result });
        }

        let outcome = SessionOutcome {
            format,
            destination: destination.to_path_buf(),
            results,
            finished_at: get_timestamp(),
        };
        log::info!("Session finished at {}: {}", outcome.finished_at, outcome.summary());
        sink.append(outcome.summary());
        Ok(outcome)
    }

    async fn download_item(
        &self,
        item: &Item,
        format: MediaFormat,
        destination: &Path,
        sink: &LogSink,
    ) -> ItemResult {
        let invocation = CommandInvocation::download(&self.tools, item, format, destination);
        sink.append(format!("Running: {}", invocation.display()));

        let handle = match self.runner.spawn(&invocation, line_handlers(sink)) {
            Ok(handle) => handle,
            Err(e) => {
                sink.error(&e);
                return ItemResult::Failed(e.to_string());
            }
        };

        match handle.wait().await {
            Ok(exit) if exit.success() => ItemResult::Succeeded,
            Ok(exit) => {
                let reason = match exit.code {
                    Some(code) => format!("downloader exited with status {code}"),
                    None => "downloader was terminated".to_string(),
                };
                sink.error(&reason);
                ItemResult::Failed(reason)
            }
            Err(e) => {
                sink.error(&e);
                ItemResult::Failed(e.to_string())
            }
        }
    }
}

/// Output goes through a fresh progress filter; error lines get the error prefix.
fn line_handlers(sink: &LogSink) -> LineHandlers {
    let filter = Mutex::new(ProgressFilter::new());
    let out_sink = sink.clone();
    let err_sink = sink.clone();
    LineHandlers {
        on_output: Arc::new(move |line: String| {
            let admit = filter.lock().map(|mut f| f.admit(&line)).unwrap_or(true);
            if admit {
                out_sink.append(line);
            }
        }),
        on_error: Arc::new(move |line: String| err_sink.error(line)),
    }
}

/// Runs one session and yields its log lines followed by exactly one
/// `Finished` event. Dropping the stream abandons the session.
pub fn session_events<R>(
    sequencer: Arc<DownloadSequencer<R>>,
    items: Vec<Item>,
    format: MediaFormat,
    destination: PathBuf,
) -> impl Stream<Item = SessionEvent> + Send + 'static
where
    R: ProcessRunner + 'static,
{
    let (sink, events) = log_sink::channel();
    let driver = async move {
        let result = sequencer.run(&items, format, &destination, &sink).await;
        sink.finish(result);
    };
    stream::select(
        events,
        stream::once(driver).filter_map(|()| future::ready(None)),
    )
}
