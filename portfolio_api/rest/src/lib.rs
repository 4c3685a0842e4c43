use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use portfolio_core_contact_contracts::ContactService;
use portfolio_core_health_contracts::HealthService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    pub allowed_origin: String,
    pub environment: String,
    pub real_ip: Option<Arc<RealIpConfig>>,
}

/// Trust a reverse proxy header for the client IP, but only when the
/// connection actually comes from that proxy.
#[derive(Debug)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthService,
    Contact: ContactService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router()?;
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {addr}");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Into::into)
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let Self {
            health,
            contact,
            config,
        } = self;

        let cors = CorsLayer::new()
            .allow_origin(
                config
                    .allowed_origin
                    .parse::<HeaderValue>()
                    .context("Failed to parse allowed origin")?,
            )
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true);

        let router = Router::new()
            .nest(
                "/api",
                Router::new()
                    .merge(routes::health::router(health.into(), config.environment))
                    .merge(routes::contact::router(contact.into())),
            )
            .fallback(routes::not_found);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        let router = middlewares::client_ip::add(config.real_ip)(router);

        Ok(router.layer(cors))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutting down gracefully");
}
