pub mod config;
pub mod invocation;
pub mod playlist;
pub mod runner;

pub use config::ToolConfig;
pub use invocation::CommandInvocation;
pub use playlist::{PlaylistResolver, YtDlpPlaylistResolver};
pub use runner::{LineHandlers, ProcessRunner, TokioProcessRunner};
