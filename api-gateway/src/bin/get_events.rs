//! Events Lambda - Handles the public calendar events endpoint.
//!
//! GET returns the calendar's events normalized for the browser widget,
//! OPTIONS answers CORS preflight.

use std::sync::Arc;

use lambda_http::{run, service_fn, Error};
use shared::{secrets, Config, Gateway, GoogleCalendarClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Load configuration, pulling the API key from Secrets Manager when only
/// a secret ARN is configured.
async fn load_config() -> Config {
    let mut config = Config::from_env();

    if config.api_key.is_none() {
        if let Some(secret_arn) = config.api_key_secret_arn.clone() {
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

            match secrets::get_api_key(&secrets_client, &secret_arn).await {
                Ok(key) => config.api_key = Some(key),
                Err(e) => warn!("Could not load API key from {}: {}", secret_arn, e),
            }
        }
    }

    if config.api_key.is_none() || config.calendar_id.is_none() {
        warn!("GOOGLE_CALENDAR_API_KEY or GOOGLE_CALENDAR_ID missing, requests will fail");
    }

    config
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = load_config().await;
    info!(
        "Serving calendar {}",
        config.calendar_id.as_deref().unwrap_or("<unset>")
    );

    let client = GoogleCalendarClient::new(config.api_base.clone());
    let gateway = Arc::new(Gateway::new(config, client));

    run(service_fn(move |event| {
        let gateway = Arc::clone(&gateway);
        async move { gateway.handle(event).await }
    }))
    .await
}
