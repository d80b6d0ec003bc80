use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;

use crate::domain::{AppError, Item};

use super::runner::background_command;
use super::ToolConfig;

/// Response of `--dump-single-json` for a flat playlist
#[derive(Debug, Clone, Deserialize)]
struct PlaylistDump {
    #[serde(default)]
    entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaylistEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Turns a playlist link into an ordered item list.
pub trait PlaylistResolver: Send + Sync {
    fn resolve(&self, url: String) -> BoxFuture<'static, Result<Vec<Item>, AppError>>;
}

/// Asks the downloader binary for the flat entry list.
#[derive(Debug, Clone)]
pub struct YtDlpPlaylistResolver {
    tools: ToolConfig,
}

impl YtDlpPlaylistResolver {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }
}

impl PlaylistResolver for YtDlpPlaylistResolver {
    fn resolve(&self, url: String) -> BoxFuture<'static, Result<Vec<Item>, AppError>> {
        let downloader = self.tools.downloader.clone();
        async move {
            log::info!("Resolving playlist {url}");
            let output = background_command(&downloader)
                .args(["--flat-playlist", "--dump-single-json", "--no-warnings"])
                .arg(&url)
                .output()
                .await
                .map_err(|e| AppError::Playlist(format!("failed to run {}: {e}", downloader.display())))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(AppError::Playlist(stderr.trim().to_string()));
            }

            parse_playlist(&output.stdout)
        }
        .boxed()
    }
}

fn parse_playlist(json: &[u8]) -> Result<Vec<Item>, AppError> {
    let dump: PlaylistDump = serde_json::from_slice(json)
        .map_err(|e| AppError::Playlist(format!("unexpected playlist data: {e}")))?;

    let items: Vec<Item> = dump
        .entries
        .into_iter()
        .filter_map(|entry| {
            let url = match (entry.url, entry.id) {
                (Some(url), _) if !url.is_empty() => url,
                (_, Some(id)) if !id.is_empty() => format!("https://www.youtube.com/watch?v={id}"),
                _ => return None,
            };
            Some((url, entry.title.unwrap_or_default()))
        })
        .enumerate()
        .map(|(index, (url, title))| Item::resolved(url, title, index == 0))
        .collect();

    if items.is_empty() {
        return Err(AppError::Playlist("playlist is empty".to_string()));
    }
    log::info!("Playlist resolved to {} entries", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist() {
        let json = br#"{
            "_type": "playlist",
            "title": "Mix",
            "entries": [
                {"id": "a1", "url": "https://www.youtube.com/watch?v=a1", "title": "First"},
                {"id": "b2", "title": "Second"},
                {"title": "No link"},
                {"id": "c3", "url": "https://www.youtube.com/watch?v=c3"}
            ]
        }"#;
        let items = parse_playlist(json).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Item::resolved("https://www.youtube.com/watch?v=a1", "First", true));
        assert_eq!(items[1], Item::resolved("https://www.youtube.com/watch?v=b2", "Second", false));
        assert_eq!(items[2].title, "");
        assert!(!items[2].is_selected);
    }

    #[test]
    fn test_parse_empty_playlist() {
        let err = parse_playlist(br#"{"entries": []}"#).unwrap_err();
        assert_eq!(err, AppError::Playlist("playlist is empty".to_string()));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_playlist(b"not json"), Err(AppError::Playlist(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolver_reports_missing_binary() {
        let resolver = YtDlpPlaylistResolver::new(ToolConfig::new("/nonexistent/yt-dlp", "/nonexistent/ffmpeg"));
        let err = resolver.resolve("https://example.com/?list=1".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Playlist(ref msg) if msg.contains("failed to run")));
    }
}
