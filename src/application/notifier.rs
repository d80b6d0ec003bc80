use std::time::Duration;

/// Runs when the user clicks a notice before it expires.
pub type Activation = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub title: String,
    pub message: String,
}

struct Shown {
    notice: Notice,
    on_activate: Option<Activation>,
}

/// One-shot, self-expiring completion notice. A new notice simply replaces
/// the visible one.
pub struct CompletionNotifier {
    delay: Duration,
    next_id: u64,
    shown: Option<Shown>,
}

impl CompletionNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 0,
            shown: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Shows a notice and returns its id; the caller schedules `expire(id)`
    /// after `delay()`.
    pub fn notify(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_activate: Activation,
    ) -> u64 {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            title: title.into(),
            message: message.into(),
        };
        log::info!("Notice {}: {}", notice.title, notice.message);
        self.shown = Some(Shown {
            notice,
            on_activate: Some(on_activate),
        });
        self.next_id
    }

    pub fn current(&self) -> Option<&Notice> {
        self.shown.as_ref().map(|shown| &shown.notice)
    }

    /// Runs the activation and dismisses. Stale ids do nothing.
    pub fn activate(&mut self, id: u64) -> bool {
        match self.take_if_current(id) {
            Some(mut shown) => {
                if let Some(action) = shown.on_activate.take() {
                    action();
                }
                true
            }
            None => false,
        }
    }

    /// Auto-dismissal. A notice that was already activated or replaced stays as is.
    pub fn expire(&mut self, id: u64) -> bool {
        self.take_if_current(id).is_some()
    }

    fn take_if_current(&mut self, id: u64) -> Option<Shown> {
        if self.current().is_some_and(|notice| notice.id == id) {
            self.shown.take()
        } else {
            None
        }
    }
}

/// Resolves to `id` once `delay` has passed.
pub async fn expiry(delay: Duration, id: u64) -> u64 {
    tokio::time::sleep(delay).await;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting() -> (Activation, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_c = Arc::clone(&hits);
        (
            Box::new(move || {
                hits_c.fetch_add(1, Ordering::SeqCst);
            }),
            hits,
        )
    }

    #[test]
    fn test_activate_runs_once_and_dismisses() {
        let mut notifier = CompletionNotifier::new(Duration::from_secs(6));
        let (action, hits) = counting();
        let id = notifier.notify("Download complete", "All audio done", action);

        assert_eq!(notifier.current().map(|n| n.message.as_str()), Some("All audio done"));
        assert!(notifier.activate(id));
        assert!(notifier.current().is_none());
        assert!(!notifier.activate(id));
        assert!(!notifier.expire(id));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_expire_dismisses_without_activation() {
        let mut notifier = CompletionNotifier::new(Duration::from_secs(6));
        let (action, hits) = counting();
        let id = notifier.notify("t", "m", action);

        assert!(notifier.expire(id));
        assert!(notifier.current().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stale_expiry_keeps_newer_notice() {
        let mut notifier = CompletionNotifier::new(Duration::from_secs(6));
        let (first, _) = counting();
        let (second, _) = counting();
        let old = notifier.notify("t", "first", first);
        let new = notifier.notify("t", "second", second);

        assert!(!notifier.expire(old));
        assert_eq!(notifier.current().map(|n| n.id), Some(new));
    }

    #[tokio::test]
    async fn test_expiry_yields_id() {
        assert_eq!(expiry(Duration::from_millis(1), 7).await, 7);
    }
}
