use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info};

use orders_log_producer::config::Config;
use orders_log_producer::generator::Generator;
use orders_log_producer::logging;
use orders_log_producer::messaging::RabbitMqConnection;
use orders_log_producer::metrics::{server::start_metrics_server, Metrics};
use orders_log_producer::producer::{
    supervise, supervisor::SHUTDOWN_GRACE, LogProducer, ProducerOutcome,
};

#[tokio::main]
async fn main() {
    setup_panic_handler();
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        queue = %config.queue_name,
        "Orders log producer starting"
    );

    let mut rabbitmq = match RabbitMqConnection::connect(config.rabbitmq_url.clone()).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to connect to RabbitMQ: {}", e);
            std::process::exit(1);
        }
    };

    let publisher = match rabbitmq.open_publisher(&config.queue_name).await {
        Ok(publisher) => publisher,
        Err(e) => {
            eprintln!("Failed to open publisher: {}", e);
            close_connection(rabbitmq).await;
            std::process::exit(1);
        }
    };

    let metrics = match Metrics::new() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to create metrics: {}", e);
            close_connection(rabbitmq).await;
            std::process::exit(1);
        }
    };

    let metrics_clone = metrics.clone();
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = start_metrics_server(metrics_clone, metrics_port).await {
            eprintln!("Metrics server error: {}", e);
        }
    });

    let shutdown = Arc::new(Notify::new());
    let mut producer = LogProducer::new(
        publisher,
        Generator::from_entropy(),
        shutdown.clone(),
        metrics,
    );
    let producer_handle = tokio::spawn(async move { producer.run().await });

    info!("Producing orders log records");

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
    };
    let outcome = supervise(producer_handle, ctrl_c, &shutdown, SHUTDOWN_GRACE).await;

    match &outcome {
        ProducerOutcome::Stopped => {}
        other => eprintln!("Producer ended abnormally: {:?}", other),
    }

    close_connection(rabbitmq).await;
    info!(exit_code = outcome.exit_code(), "Orders log producer stopped");

    std::process::exit(outcome.exit_code());
}

async fn close_connection(rabbitmq: RabbitMqConnection) {
    if let Err(e) = rabbitmq.close().await {
        eprintln!("Error during shutdown: {}", e);
    }
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic payload"
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        eprintln!("PANIC: {} at {}", message, location);
        eprintln!("Thread: {:?}", std::thread::current().name());
    }));
}
