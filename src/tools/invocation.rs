use std::path::{Path, PathBuf};

use crate::domain::{Item, MediaFormat};
use crate::utils::output_stem;

use super::ToolConfig;

/// One external command, built fresh for every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CommandInvocation {
    /// Downloader call for one item. `--newline` keeps progress one event per line.
    pub fn download(tools: &ToolConfig, item: &Item, format: MediaFormat, destination: &Path) -> Self {
        let template = destination.join(format!("{}.%(ext)s", output_stem(item)));

        let mut args = vec![item.source_url.clone()];
        args.extend(format.downloader_flags().iter().map(|flag| flag.to_string()));
        args.push("-o".to_string());
        args.push(template.to_string_lossy().into_owned());
        args.push("--windows-filenames".to_string());
        args.push("--ffmpeg-location".to_string());
        args.push(tools.media_processor.to_string_lossy().into_owned());
        args.push("--newline".to_string());

        Self {
            program: tools.downloader.clone(),
            args,
            working_dir: destination.to_path_buf(),
        }
    }

    /// Shell-like rendering for the log.
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            if arg.contains(' ') || arg.is_empty() {
                out.push('"');
                out.push_str(arg);
                out.push('"');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}
