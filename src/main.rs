// src/main.rs
use anyhow::Result;
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use endpoint_monitor::{
    alert::{AlertDispatcher, LogNotifier, MailNotifier, Notifier, SmsNotifier},
    config::{self, Config},
    metrics::MetricsRegistry,
    probe::HttpProber,
    registry::{load_checks, InMemoryRegistry},
    scheduler::CycleScheduler,
};

/// How long shutdown waits for an in-flight cycle.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(65);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("endpoint_monitor=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path)?;

    let metrics_registry = MetricsRegistry::new()?;
    let metrics = metrics_registry.collector();

    let checks = load_checks(&config.registry.checks_file).await?;
    let registry = Arc::new(InMemoryRegistry::new(checks));

    let prober = Arc::new(HttpProber::new(&config.probe)?);
    let dispatcher = Arc::new(AlertDispatcher::new(
        build_notifiers(&config)?,
        Some(metrics.clone()),
    ));
    info!("Alert channels: {:?}", dispatcher.channels());

    let scheduler = CycleScheduler::builder(config.scheduler.clone())
        .registry(registry)
        .prober(prober)
        .alerts(dispatcher)
        .metrics(metrics)
        .build()?;

    if config.metrics.enabled {
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(metrics_addr, metrics_registry, config.metrics.path.clone()).await?;
    }

    scheduler.start().await;

    shutdown_signal().await;

    scheduler.stop().await;
    if tokio::time::timeout(DRAIN_TIMEOUT, scheduler.wait_idle())
        .await
        .is_err()
    {
        warn!("In-flight cycle did not finish within {:?}", DRAIN_TIMEOUT);
    }

    let stats = scheduler.stats();
    info!(
        "Stopped after {} cycles ({} skipped, {} aborted)",
        stats.cycles_completed, stats.cycles_skipped, stats.cycles_aborted
    );
    Ok(())
}

fn build_notifiers(config: &Config) -> Result<Vec<Arc<dyn Notifier>>> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

    if config.notifications.log_alerts {
        notifiers.push(Arc::new(LogNotifier));
    }
    if let Some(sms) = &config.notifications.sms {
        notifiers.push(Arc::new(SmsNotifier::new(sms.clone())?));
    }
    if let Some(mail) = &config.notifications.mail {
        notifiers.push(Arc::new(MailNotifier::new(mail.clone())?));
    }

    if notifiers.is_empty() {
        warn!("No alert channels configured, state changes will not be delivered");
    }
    Ok(notifiers)
}

async fn start_metrics_server(
    addr: SocketAddr,
    registry: MetricsRegistry,
    path: String,
) -> Result<()> {
    let registry = Arc::new(registry);
    let metrics_path = Arc::new(path);
    let service_path = metrics_path.clone();

    let make_service = hyper::service::make_service_fn(move |_| {
        let registry = registry.clone();
        let path = service_path.clone();

        async move {
            Ok::<_, Infallible>(hyper::service::service_fn(move |req: Request<Body>| {
                let registry = registry.clone();
                let path = path.clone();

                async move {
                    let response = if req.uri().path() == path.as_str() {
                        Response::builder()
                            .status(StatusCode::OK)
                            .header("Content-Type", "text/plain; version=0.0.4")
                            .body(Body::from(registry.gather()))
                    } else {
                        Response::builder()
                            .status(StatusCode::NOT_FOUND)
                            .body(Body::from("Not Found"))
                    };
                    Ok::<_, Infallible>(
                        response.unwrap_or_else(|_| Response::new(Body::empty())),
                    )
                }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);

    info!(
        "Metrics server listening on http://{}{}",
        addr,
        metrics_path.as_str()
    );

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
