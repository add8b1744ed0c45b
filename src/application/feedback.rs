use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::{Dialog, FeedbackEvent};

/// Where user-visible download messages go.
pub trait Feedback: Send + Sync {
    /// Transient notice; auto-dismissed by the shell.
    fn notice(&self, text: String);

    /// Blocking dialog with a single acknowledgement action.
    fn dialog(&self, dialog: Dialog);
}

/// Forwards feedback to the UI thread.
#[derive(Debug, Clone)]
pub struct ChannelFeedback {
    tx: UnboundedSender<FeedbackEvent>,
}

pub fn feedback_channel() -> (ChannelFeedback, UnboundedReceiver<FeedbackEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelFeedback { tx }, rx)
}

impl ChannelFeedback {
    fn send(&self, event: FeedbackEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("feedback dropped, shell is gone");
        }
    }
}

impl Feedback for ChannelFeedback {
    fn notice(&self, text: String) {
        self.send(FeedbackEvent::Notice(text));
    }

    fn dialog(&self, dialog: Dialog) {
        self.send(FeedbackEvent::Dialog(dialog));
    }
}
