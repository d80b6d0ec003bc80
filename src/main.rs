mod app;
mod application;
mod domain;
mod tools;
mod ui;
mod utils;

use env_logger::Env;
use iced::{window, Size};

fn main() -> iced::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Video Downloader")
        .subscription(app::subscription)
        .window(window::Settings {
            size: Size::new(560.0, 480.0),
            // closing mid-download asks first
            exit_on_close_request: false,
            ..Default::default()
        })
        .run()
}
