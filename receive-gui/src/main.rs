#![windows_subsystem = "windows"]

use std::{error::Error, io::Write, path::PathBuf, process};

use iced::Size;
use tracing::error;

use receive_gui::{
    app::ReceiveApp,
    config::Config,
    dir::ReceiveDirectory,
    logger::{parse_log_level, setup_logger},
    VERSION,
};

#[derive(Debug, PartialEq)]
enum Arg {
    DatadirPath(ReceiveDirectory),
}

fn parse_args(args: Vec<String>) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", VERSION);
        process::exit(1);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: receive-gui [OPTIONS]

Options:
    --datadir <PATH>    Path of the data directory
    -v, --version       Display receive-gui version
    -h, --help          Print help
        "#
        );
        process::exit(1);
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--datadir" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::DatadirPath(ReceiveDirectory::new(PathBuf::from(a))));
            } else {
                return Err("missing arg to --datadir".into());
            }
        } else if arg.starts_with("--") {
            return Err(format!("unknown option {}", arg).into());
        }
    }

    Ok(res)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().collect())?;
    let datadir = match args.as_slice() {
        [] => ReceiveDirectory::new_default()?,
        [Arg::DatadirPath(datadir)] => datadir.clone(),
        _ => {
            return Err("Unknown args combination".into());
        }
    };
    if !datadir.exists() {
        datadir.init()?;
    }

    let config = Config::from_file_or_default(&datadir.config_path())?;
    let log_level = match parse_log_level()? {
        Some(level) => level,
        None => config.log_level()?,
    };
    if let Err(e) = setup_logger(log_level, &datadir) {
        eprintln!("{}", e);
    }

    setup_panic_hook();

    if let Err(e) = iced::application(ReceiveApp::title, ReceiveApp::update, ReceiveApp::view)
        .theme(|_| iced::Theme::Dark)
        .subscription(ReceiveApp::subscription)
        .window_size(Size::new(420.0, 640.0))
        .run_with(move || ReceiveApp::new(config))
    {
        log::error!("{}", e);
        Err(format!("Failed to launch UI: {}", e).into())
    } else {
        Ok(())
    }
}

// A panic in any thread should stop the main thread, and print the panic.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(move |panic_info| {
        let file = panic_info
            .location()
            .map(|l| l.file())
            .unwrap_or_else(|| "'unknown'");
        let line = panic_info
            .location()
            .map(|l| l.line().to_string())
            .unwrap_or_else(|| "'unknown'".to_string());

        let bt = backtrace::Backtrace::new();
        let info = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned());
        error!(
            "panic occurred at line {} of file {}: {:?}\n{:?}",
            line, file, info, bt
        );

        std::io::stdout().flush().expect("Flushing stdout");
        std::process::exit(1);
    }));
}
