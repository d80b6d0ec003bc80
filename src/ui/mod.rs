pub mod dialogs;
pub mod download;
pub mod link;
pub mod selection;

pub use download::{DownloadMessage, DownloadView};
pub use link::{LinkMessage, LinkView};
pub use selection::{SelectionMessage, SelectionView};
