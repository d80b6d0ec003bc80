use std::path::PathBuf;

use iced::{
    widget::{button, column, container, row, scrollable, text, Column, Space},
    Element, Length,
};

use crate::application::{notifier::Notice, LogBuffer};
use crate::domain::{Item, MediaFormat};

/// Download screen: format buttons, live log and the completion notice.
pub struct DownloadView {
    pub items: Vec<Item>,
    pub log: LogBuffer,
    pub is_downloading: bool,
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    DownloadPressed(MediaFormat),
    NoticePressed(u64),
    BackPressed,
    ExitPressed,
}

impl DownloadView {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            log: LogBuffer::default(),
            is_downloading: false,
            destination: None,
        }
    }

    pub fn view<'a>(&'a self, notice: Option<&'a Notice>) -> Element<'a, DownloadMessage> {
        let idle = !self.is_downloading;

        let lines = Column::with_children(
            self.log
                .lines()
                .iter()
                .map(|line| text(line).size(13).into()),
        )
        .spacing(2);

        let log = container(scrollable(lines).anchor_bottom().height(Length::Fill).width(Length::Fill))
            .padding(8)
            .height(Length::Fill)
            .style(container::rounded_box);

        let controls = row![
            button("Video")
                .on_press_maybe(idle.then_some(DownloadMessage::DownloadPressed(MediaFormat::Video)))
                .padding([10, 20]),
            button("Audio")
                .on_press_maybe(idle.then_some(DownloadMessage::DownloadPressed(MediaFormat::Audio)))
                .padding([10, 20]),
            button("Back")
                .on_press_maybe(idle.then_some(DownloadMessage::BackPressed))
                .padding([10, 20]),
            // exit stays enabled, it asks before abandoning a session
            button("Exit")
                .on_press(DownloadMessage::ExitPressed)
                .padding([10, 20]),
        ]
        .spacing(10);

        let toast: Element<'a, DownloadMessage> = match notice {
            Some(notice) => button(column![
                text(&notice.title).size(16),
                text(&notice.message).size(13),
                text("Click to open the folder").size(11),
            ])
            .on_press(DownloadMessage::NoticePressed(notice.id))
            .style(button::success)
            .width(Length::Fill)
            .padding(10)
            .into(),
            None => Space::new().height(Length::Fixed(0.0)).into(),
        };

        let queued = self.items.iter().filter(|item| item.is_selected).count();
        let header = match &self.destination {
            Some(dir) => format!("{queued} item(s) queued, saving to {}", dir.display()),
            None => format!("{queued} item(s) queued"),
        };

        column![
            text(header).size(14),
            log,
            toast,
            controls,
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
