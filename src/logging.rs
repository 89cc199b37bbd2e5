use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::producer::RECORD_TRACE_TARGET;

pub fn subscriber<W>(directives: String, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Invalid log directives {:?} ({}), using info", directives, e);
        EnvFilter::new(format!("info,{}=info", RECORD_TRACE_TARGET))
    });

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish()
}

/// Installs the stdout subscriber for the process.
pub fn init(config: &Config) {
    let subscriber = subscriber(config.log_filter(), std::io::stdout);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
