use std::sync::Arc;
use std::time::Duration;

use iced::Task;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{ApiClient, ApiConfig, DeviceTokenRequest};
use crate::application::{
    feedback_channel, DownloadCoordinator, DownloadDirectories, DownloadServices, HttpTransfer,
    JournalRegistry, NavigationInterceptor, TokenRegistrar,
};
use crate::config::ShellConfig;
use crate::domain::{Dialog, DialogLevel, FeedbackEvent, NavigationEvent};
use crate::ui::{ShellMessage, ShellView};

pub struct DownloadApp {
    view: ShellView,
    api_client: ApiClient,
    coordinator: DownloadCoordinator,
    interceptor: NavigationInterceptor,
    registrar: TokenRegistrar,
    notice_ttl: Duration,
    next_notice: u64,
}

impl DownloadApp {
    pub fn new(config: ShellConfig, runtime: Handle) -> (Self, Task<Message>) {
        let api_client = ApiClient::new(ApiConfig {
            token_endpoint: config.token_endpoint.clone(),
        });
        let (feedback, events) = feedback_channel();

        let registry = JournalRegistry::new(&config.data_dir);
        log::info!("download journal at {}", registry.journal_path().display());

        let coordinator = DownloadCoordinator::new(
            DownloadServices {
                transfer: Arc::new(HttpTransfer::new(api_client.clone())),
                registry: Arc::new(registry),
                feedback: Arc::new(feedback),
                directories: DownloadDirectories::from_config(&config),
            },
            runtime,
        );
        let mut interceptor = NavigationInterceptor::new(coordinator.clone(), config.dedup_window);
        // The landing page is the first navigation the web view makes.
        interceptor.should_allow_navigation(&config.site_url);

        let app = Self {
            view: ShellView::new(config.site_url.clone()),
            api_client,
            coordinator,
            interceptor,
            registrar: TokenRegistrar::new(config.device_token.clone()),
            notice_ttl: config.notice_ttl,
            next_notice: 0,
        };

        (app, feedback_stream(events))
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(ShellMessage),
    /// Notice or dialog raised by the download pipeline
    Feedback(FeedbackEvent),
    NoticeExpired(u64),
    DialogClosed,
    TokenRegistered(Result<(), String>),
}

/// Delivers pipeline feedback to `update` as it arrives.
fn feedback_stream(events: UnboundedReceiver<FeedbackEvent>) -> Task<Message> {
    Task::stream(futures::stream::unfold(events, |mut events| async move {
        events
            .recv()
            .await
            .map(|event| (Message::Feedback(event), events))
    }))
}

async fn show_dialog(dialog: Dialog) {
    let level = match dialog.level {
        DialogLevel::Info => rfd::MessageLevel::Info,
        DialogLevel::Error => rfd::MessageLevel::Error,
    };
    rfd::AsyncMessageDialog::new()
        .set_level(level)
        .set_title(&dialog.title)
        .set_description(&dialog.body)
        .set_buttons(rfd::MessageButtons::Ok)
        .show()
        .await;
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    let task = match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());
            handle_ui(app, ui_msg)
        }
        Message::Feedback(FeedbackEvent::Notice(text)) => {
            let id = app.next_notice;
            app.next_notice += 1;
            app.view.notices.push((id, text));

            let ttl = app.notice_ttl;
            Task::perform(tokio::time::sleep(ttl), move |_| Message::NoticeExpired(id))
        }
        Message::Feedback(FeedbackEvent::Dialog(dialog)) => {
            app.view.status_message = dialog.title.clone();
            app.view.open_dialog = Some(dialog.title.clone());
            Task::perform(show_dialog(dialog), |_| Message::DialogClosed)
        }
        Message::NoticeExpired(id) => {
            app.view.notices.retain(|(notice_id, _)| *notice_id != id);
            Task::none()
        }
        Message::DialogClosed => {
            app.view.open_dialog = None;
            Task::none()
        }
        Message::TokenRegistered(result) => {
            match result {
                Ok(()) => log::info!("device token registered"),
                Err(e) => log::warn!("device token registration failed: {}", e),
            }
            Task::none()
        }
    };

    app.view.is_downloading = app.coordinator.is_active();
    task
}

fn handle_ui(app: &mut DownloadApp, message: ShellMessage) -> Task<Message> {
    match message {
        ShellMessage::LinkSubmitted => {
            let event = NavigationEvent::new(app.view.link_input.trim());
            if event.url.is_empty() {
                return Task::none();
            }
            if app.interceptor.on_navigation(&event) {
                app.view.site_url = event.url.clone();
                app.view.status_message = format!("Showing {}", event.url);
            } else {
                app.view.status_message = format!("Download requested: {}", event.url);
            }
            app.view.link_input.clear();
            Task::none()
        }
        ShellMessage::PageMessageSubmitted => {
            let payload = std::mem::take(&mut app.view.page_message_input);
            let request = app.registrar.observe_page_message(&payload);
            if let Some(id) = app.registrar.user().and_then(|user| user.id_label()) {
                app.view.status_message = format!("Signed in as user {}", id);
            }
            match request {
                Some(request) => register_token(app.api_client.clone(), request),
                None => Task::none(),
            }
        }
        ShellMessage::CancelPressed => {
            let source = app.coordinator.active_url();
            if app.coordinator.cancel_active() {
                app.view.status_message = match source {
                    Some(url) => format!("Download cancelled: {}", url),
                    None => "Download cancelled".to_string(),
                };
            }
            Task::none()
        }
        ShellMessage::LinkChanged(_) | ShellMessage::PageMessageChanged(_) => Task::none(),
    }
}

fn register_token(api_client: ApiClient, request: DeviceTokenRequest) -> Task<Message> {
    Task::perform(
        async move {
            api_client
                .save_device_token(&request)
                .await
                .map_err(|e| e.to_string())
        },
        Message::TokenRegistered,
    )
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
