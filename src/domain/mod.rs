pub mod error;
pub mod model;

pub use error::{DownloadError, ShellError};
pub use model::{
    CompletedDownload, Dialog, DialogLevel, DownloadLocation, DownloadTask, FeedbackEvent,
    NavigationEvent, ResolvedDestination,
};
