use std::sync::Arc;

use portfolio_api_rest::{RealIpConfig, RestServer, RestServerConfig};
use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use portfolio_core_health_impl::{HealthServiceConfig, HealthServiceImpl};
use portfolio_email_contracts::EmailService;
use portfolio_shared_impl::{
    rate_limit::{FixedWindowRateLimiter, RateLimiterConfig},
    time::TimeServiceImpl,
};
use portfolio_templates_impl::TemplateServiceImpl;
use tracing::info;

use crate::email;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email).await?;
    email.ping().await?;

    let time = TimeServiceImpl;

    let rate_limit = FixedWindowRateLimiter::new(
        time,
        RateLimiterConfig {
            window: config.rate_limit.window.into(),
            max_requests: config.rate_limit.max_requests,
        },
    );

    let contact = ContactServiceImpl::new(
        rate_limit,
        time,
        email.clone(),
        TemplateServiceImpl::new(),
        ContactServiceConfig {
            recipient: Arc::new(config.contact.recipient),
            auto_reply: config.contact.auto_reply,
        },
    );

    let health = HealthServiceImpl::new(
        time,
        email,
        HealthServiceConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let server = RestServer::new(
        health,
        contact,
        RestServerConfig {
            addr: (config.http.host, config.http.port).into(),
            allowed_origin: config.http.allowed_origin,
            environment: config.environment.to_string(),
            real_ip: config.http.real_ip.map(|real_ip| {
                Arc::new(RealIpConfig {
                    header: real_ip.header,
                    set_from: real_ip.set_from,
                })
            }),
        },
    );

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
