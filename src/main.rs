use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use golden_palace_reservations::config::Config;
use golden_palace_reservations::controller::{self, AppState};
use golden_palace_reservations::mail::{MailDispatcher, SmtpMailTransport};
use golden_palace_reservations::repositories::postgres_repo::{self, PostgresConnectionRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::parse();
    info!("Starting reservation service in {} environment", config.environment);

    let postgres_connection = postgres_repo::connect(
        &config.database_url,
        config.database_pool_size,
        Duration::from_secs(config.database_connect_timeout_secs),
    )
    .await?;
    let postgres_repo = PostgresConnectionRepo::new(postgres_connection);
    postgres_repo.ensure_schema().await?;

    let mailer = match config.mail_config() {
        Some(mail_config) => {
            let transport = SmtpMailTransport::new(&mail_config)
                .with_context(|| format!("Failed to configure SMTP relay {}", mail_config.host))?;
            info!(
                "Reservation emails will be sent through {}:{}",
                mail_config.host, mail_config.port
            );
            Some(Arc::new(MailDispatcher::new(mail_config, Arc::new(transport))))
        }
        None => {
            warn!("EMAIL_USER or EMAIL_PASS not set, reservation emails are disabled");
            None
        }
    };

    let app_state = AppState {
        store: Arc::new(postgres_repo),
        mailer,
    };

    controller::serve(app_state, &config).await
}
