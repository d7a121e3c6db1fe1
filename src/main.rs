mod calc;
mod cmd;
mod data;
mod ui;

use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE: &str = "pension.log";

#[derive(Parser)]
#[command(
    name = "pension",
    about = "Countdown to the statutory retirement date (first day of the month after the 65th birthday)"
)]
struct Cli {
    /// Directory holding config.yaml, the remembered birth date and the log (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(&cli.data_dir)?;
    data::persistence::set_data_dir(data_dir.clone());
    init_tracing(&data_dir);

    cmd::root::run()
}

fn resolve_data_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

/// Logs go to a file in the data directory. Writing to stdout or stderr would
/// corrupt the TUI, so without a log file there are no logs at all.
fn init_tracing(data_dir: &Path) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = std::fs::create_dir_all(data_dir).ok().and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))
            .ok()
    });

    match file {
        Some(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
        }
        None => tracing_subscriber::registry().with(env_filter).init(),
    }
}
