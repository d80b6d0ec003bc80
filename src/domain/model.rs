use std::path::PathBuf;

/// One downloadable unit: a single video or one playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub source_url: String,
    pub title: String,
    /// `false` when `title` is only a display placeholder.
    pub title_resolved: bool,
    pub is_selected: bool,
}

impl Item {
    pub fn placeholder(source_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: label.into(),
            title_resolved: false,
            is_selected: true,
        }
    }

    pub fn resolved(source_url: impl Into<String>, title: impl Into<String>, is_selected: bool) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            title_resolved: true,
            is_selected,
        }
    }

    pub fn toggle(&mut self) {
        self.is_selected = !self.is_selected;
    }
}

/// Selected subset of `items`, in input order.
pub fn selected(items: &[Item]) -> Vec<Item> {
    items.iter().filter(|item| item.is_selected).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Video,
    Audio,
}

impl MediaFormat {
    pub fn label(self) -> &'static str {
        match self {
            MediaFormat::Video => "video",
            MediaFormat::Audio => "audio",
        }
    }

    /// Downloader flags selecting the output kind.
    pub fn downloader_flags(self) -> &'static [&'static str] {
        match self {
            MediaFormat::Video => &["-f", "bestvideo+bestaudio", "--merge-output-format", "mp4"],
            MediaFormat::Audio => &["-x", "--audio-format", "mp3", "--audio-quality", "0"],
        }
    }

    pub fn completion_message(self) -> String {
        match self {
            MediaFormat::Video => "All selected video downloads have finished".to_string(),
            MediaFormat::Audio => "All selected audio downloads have finished".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemResult {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: Item,
    pub result: ItemResult,
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.result, ItemResult::Succeeded)
    }
}

/// Structured result of one sequencer run. Dropped once the completion
/// notice has been raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub format: MediaFormat,
    pub destination: PathBuf,
    pub results: Vec<ItemOutcome>,
    /// Unix timestamp, seconds.
    pub finished_at: u64,
}

impl SessionOutcome {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} {} downloads succeeded",
            self.results.len() - self.failed_count(),
            self.results.len(),
            self.format.label()
        )
    }
}
