use iced::{
    widget::{button, column, row, text, text_input, Column, Space},
    Element, Length,
};

/// Main view state
pub struct ShellView {
    pub site_url: String,
    pub link_input: String,
    pub page_message_input: String,
    pub status_message: String,
    /// Transient notices, oldest first: (id, text)
    pub notices: Vec<(u64, String)>,
    pub is_downloading: bool,
    /// Title of the dialog waiting for acknowledgement
    pub open_dialog: Option<String>,
}

impl ShellView {
    pub fn new(site_url: String) -> Self {
        Self {
            status_message: format!("Showing {}", site_url),
            site_url,
            link_input: String::new(),
            page_message_input: String::new(),
            notices: Vec::new(),
            is_downloading: false,
            open_dialog: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ShellMessage {
    LinkChanged(String),
    LinkSubmitted,
    PageMessageChanged(String),
    PageMessageSubmitted,
    CancelPressed,
}

impl ShellView {
    pub fn update(&mut self, message: ShellMessage) {
        match message {
            ShellMessage::LinkChanged(link) => {
                self.link_input = link;
            }
            ShellMessage::PageMessageChanged(payload) => {
                self.page_message_input = payload;
            }
            ShellMessage::LinkSubmitted
            | ShellMessage::PageMessageSubmitted
            | ShellMessage::CancelPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, ShellMessage> {
        let notices: Column<'_, ShellMessage> = Column::with_children(
            self.notices
                .iter()
                .map(|(_, notice)| text(notice).size(14).into()),
        )
        .spacing(4);

        let dialog_hint = match &self.open_dialog {
            Some(title) => format!("Waiting for acknowledgement: {}", title),
            None => String::new(),
        };

        column![
            text("Kota Career").size(32),
            text(&self.site_url).size(14),
            Space::new().height(Length::Fixed(20.0)),
            text("Open link:").size(16),
            row![
                text_input("https://...", &self.link_input)
                    .on_input(ShellMessage::LinkChanged)
                    .on_submit(ShellMessage::LinkSubmitted)
                    .padding(10),
                button("Open")
                    .on_press(ShellMessage::LinkSubmitted)
                    .padding([10, 20]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            text(&self.status_message).size(14),
            button("Cancel download")
                .on_press_maybe(self.is_downloading.then_some(ShellMessage::CancelPressed))
                .padding([10, 20]),
            notices,
            text(dialog_hint).size(14),
            Space::new().height(Length::Fixed(20.0)),
            text("Page message:").size(16),
            text_input("{\"id\": ..., \"model\": ...}", &self.page_message_input)
                .on_input(ShellMessage::PageMessageChanged)
                .on_submit(ShellMessage::PageMessageSubmitted)
                .padding(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
