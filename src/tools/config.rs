use std::path::PathBuf;
use std::time::Duration;

use crate::domain::AppError;

const DOWNLOADER_ENV: &str = "EZDL_YT_DLP";
const MEDIA_PROCESSOR_ENV: &str = "EZDL_FFMPEG";
const NOTIFY_SECONDS_ENV: &str = "EZDL_NOTIFY_SECONDS";

const DOWNLOADER_BIN: &str = "yt-dlp";
const MEDIA_PROCESSOR_BIN: &str = "ffmpeg";

/// Completion notices dismiss themselves after this long unless overridden.
pub const DEFAULT_NOTIFY_DELAY: Duration = Duration::from_secs(6);

/// Locations of the two external executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub downloader: PathBuf,
    pub media_processor: PathBuf,
}

impl ToolConfig {
    pub fn new(downloader: impl Into<PathBuf>, media_processor: impl Into<PathBuf>) -> Self {
        Self {
            downloader: downloader.into(),
            media_processor: media_processor.into(),
        }
    }

    /// Environment override first, then `PATH`.
    pub fn discover() -> Result<Self, AppError> {
        let downloader = locate(DOWNLOADER_ENV, DOWNLOADER_BIN)?;
        let media_processor = locate(MEDIA_PROCESSOR_ENV, MEDIA_PROCESSOR_BIN)?;
        log::info!(
            "Using downloader {} and media processor {}",
            downloader.display(),
            media_processor.display()
        );
        Ok(Self::new(downloader, media_processor))
    }
}

fn locate(var: &str, bin: &str) -> Result<PathBuf, AppError> {
    if let Some(path) = env_path(var) {
        return Ok(path);
    }
    which::which(bin).map_err(|e| {
        log::warn!("{bin} not found on PATH: {e}");
        AppError::ToolMissing(format!("{bin} (set {var} or add it to PATH)"))
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn notify_delay() -> Duration {
    parse_notify_seconds(std::env::var(NOTIFY_SECONDS_ENV).ok().as_deref())
}

fn parse_notify_seconds(value: Option<&str>) -> Duration {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_NOTIFY_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notify_seconds() {
        assert_eq!(parse_notify_seconds(None), DEFAULT_NOTIFY_DELAY);
        assert_eq!(parse_notify_seconds(Some("10")), Duration::from_secs(10));
        assert_eq!(parse_notify_seconds(Some(" 3 ")), Duration::from_secs(3));
        assert_eq!(parse_notify_seconds(Some("0")), DEFAULT_NOTIFY_DELAY);
        assert_eq!(parse_notify_seconds(Some("soon")), DEFAULT_NOTIFY_DELAY);
    }

    #[test]
    fn test_locate_missing_tool() {
        let err = locate("EZDL_TEST_UNSET_VAR", "ezdl-no-such-binary-7f3a").unwrap_err();
        assert!(matches!(err, AppError::ToolMissing(ref msg) if msg.contains("ezdl-no-such-binary-7f3a")));
    }
}
