use iced::{
    widget::{button, column, row, text, text_input, Space},
    Element, Length,
};

/// Link entry screen
pub struct LinkView {
    pub link: String,
    pub status_message: String,
    pub is_resolving: bool,
}

impl Default for LinkView {
    fn default() -> Self {
        Self {
            link: String::new(),
            status_message: "Paste a video or playlist link".to_string(),
            is_resolving: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LinkMessage {
    LinkChanged(String),
    ConfirmPressed,
    ExitPressed,
}

impl LinkView {
    pub fn update(&mut self, message: LinkMessage) {
        match message {
            LinkMessage::LinkChanged(link) => {
                self.link = link;
            }
            LinkMessage::ConfirmPressed | LinkMessage::ExitPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, LinkMessage> {
        let confirm = (!self.is_resolving).then_some(LinkMessage::ConfirmPressed);

        column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Link:").size(16),
            text_input("https://www.youtube.com/watch?v=...", &self.link)
                .on_input(LinkMessage::LinkChanged)
                .on_submit(LinkMessage::ConfirmPressed)
                .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            text(&self.status_message).size(14),
            Space::new().height(Length::Fixed(20.0)),
            row![
                button("Confirm").on_press_maybe(confirm).padding([10, 20]),
                button("Exit")
                    .on_press(LinkMessage::ExitPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
