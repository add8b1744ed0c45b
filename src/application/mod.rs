pub mod directories;
pub mod download_coordinator;
pub mod feedback;
pub mod navigation;
pub mod registry;
pub mod session;
pub mod transfer;

#[cfg(test)]
mod testing;

pub use directories::DownloadDirectories;
pub use download_coordinator::{DownloadCoordinator, DownloadServices};
pub use feedback::feedback_channel;
pub use navigation::NavigationInterceptor;
pub use registry::JournalRegistry;
pub use session::TokenRegistrar;
pub use transfer::HttpTransfer;
