use crate::dir::ReceiveDirectory;
use std::{error::Error, fs::File, str::FromStr, sync::Arc};
use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt::writer::BoxMakeWriter,
    prelude::*,
};

const GUI_LOG_FILE_NAME: &str = "receive-gui.log";

#[derive(Debug)]
pub enum LoggerError {
    Io(std::io::Error),
    Init(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to open log file: {}", e),
            Self::Init(e) => write!(f, "Failed to set up logger: {}", e),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> LoggerError {
        LoggerError::Io(e)
    }
}

pub fn setup_logger(
    log_level: filter::LevelFilter,
    datadir: &ReceiveDirectory,
) -> Result<(), LoggerError> {
    let file = File::create(datadir.path().join(GUI_LOG_FILE_NAME))?;
    let writer = BoxMakeWriter::new(Arc::new(file));

    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(false);

    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_file(false);

    tracing_subscriber::registry()
        .with(
            stdout_log
                .and_then(file_log)
                .with_filter(log_level)
                // Rendering and windowing crates are too chatty.
                .with_filter(filter::filter_fn(|metadata| {
                    !metadata.target().starts_with("iced_wgpu")
                        && !metadata.target().starts_with("iced_winit")
                        && !metadata.target().starts_with("wgpu_core")
                        && !metadata.target().starts_with("wgpu_hal")
                        && !metadata.target().starts_with("naga")
                        && !metadata.target().starts_with("winit")
                        && !metadata.target().starts_with("mio")
                        && !metadata.target().starts_with("cosmic_text")
                        && !metadata.target().starts_with("polling")
                        && !metadata.target().starts_with("calloop")
                        && !metadata.target().starts_with("tokio")
                        && !metadata.target().starts_with("iced_graphics")
                        && !metadata.target().starts_with("iced_runtime")
                        && !metadata.target().starts_with("iced_core")
                })),
        )
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))
}

/// Parse LOG_LEVEL environment variable.
pub fn parse_log_level() -> Result<Option<LevelFilter>, Box<dyn Error>> {
    if let Ok(l) = std::env::var("LOG_LEVEL") {
        Ok(Some(LevelFilter::from_str(&l)?))
    } else {
        Ok(None)
    }
}
