use iced::{
    widget::{button, column, row, scrollable, text, Column},
    Element, Length,
};

use crate::domain::Item;

/// Playlist entry picker. Owns the items until they move on to the download screen.
pub struct SelectionView {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum SelectionMessage {
    ItemToggled(usize),
    ConfirmPressed,
    BackPressed,
    ExitPressed,
}

impl SelectionView {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn update(&mut self, message: SelectionMessage) {
        match message {
            SelectionMessage::ItemToggled(index) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.toggle();
                }
            }
            SelectionMessage::ConfirmPressed
            | SelectionMessage::BackPressed
            | SelectionMessage::ExitPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_selected).count()
    }

    pub fn view(&self) -> Element<'_, SelectionMessage> {
        let entries = Column::with_children(self.items.iter().enumerate().map(|(index, item)| {
            let label = if item.title.is_empty() {
                item.source_url.as_str()
            } else {
                item.title.as_str()
            };
            let style = if item.is_selected {
                button::primary
            } else {
                button::secondary
            };
            button(text(label).size(14))
                .on_press(SelectionMessage::ItemToggled(index))
                .style(style)
                .width(Length::Fill)
                .padding(10)
                .into()
        }))
        .spacing(6);

        column![
            text("Choose the videos to download").size(24),
            text(format!("{} of {} selected", self.selected_count(), self.items.len())).size(14),
            scrollable(entries).height(Length::Fill),
            row![
                button("Confirm")
                    .on_press(SelectionMessage::ConfirmPressed)
                    .padding([10, 20]),
                button("Back")
                    .on_press(SelectionMessage::BackPressed)
                    .padding([10, 20]),
                button("Exit")
                    .on_press(SelectionMessage::ExitPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
