mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use domain::ShellError;

fn main() -> Result<(), ShellError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::ShellConfig::from_env();
    log::info!("wrapping {}", config.site_url);

    // Downloads run here, independent of the UI executor.
    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    iced::application(
        move || app::DownloadApp::new(config.clone(), handle.clone()),
        app::update,
        app::view,
    )
    .title("Kota Career")
    .run()?;

    Ok(())
}
