use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppError;
use crate::options::LogOptions;

const TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

fn stamp(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", stamp(&Local::now().naive_local()))
    }
}

fn directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `--verbose`.
///
/// With `--log-file` events are appended to that file, otherwise they go to
/// stderr so stdout stays free for tool output.
pub fn init(opts: &LogOptions) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(opts.verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    // a second init in the same process is a no-op
    let _ = match &opts.log_file {
        Some(path) => {
            let file = OpenOptions::new().append(true).create(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_timer(LocalTime)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => registry
            .with(
                fmt::layer()
                    .with_timer(LocalTime)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    Ok(())
}
