use std::path::PathBuf;

use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

pub async fn pick_destination() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Choose download location")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Asks before abandoning a running session. `true` means leave.
pub async fn confirm_exit() -> bool {
    let answer = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Confirm exit")
        .set_description("A download is still running. Exit anyway? The current download will be interrupted.")
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    answer == MessageDialogResult::Yes
}
