use std::sync::OnceLock;

use regex::Regex;

const PROGRESS_MARKER: &str = "[download]";

fn percent_token() -> Option<&'static Regex> {
    static PERCENT: OnceLock<Option<Regex>> = OnceLock::new();
    PERCENT
        .get_or_init(|| Regex::new(r"\d+(?:\.\d+)?%").ok())
        .as_ref()
}

pub fn is_progress_line(line: &str) -> bool {
    line.contains(PROGRESS_MARKER) && percent_token().is_some_and(|re| re.is_match(line))
}

/// Drops a progress line when it repeats the one forwarded just before it.
/// One instance per item invocation.
#[derive(Debug, Default)]
pub struct ProgressFilter {
    last_progress: Option<String>,
}

impl ProgressFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `line` should reach the log.
    pub fn admit(&mut self, line: &str) -> bool {
        if !is_progress_line(line) {
            self.last_progress = None;
            return true;
        }
        if self.last_progress.as_deref() == Some(line) {
            return false;
        }
        self.last_progress = Some(line.to_string());
        true
    }
}
