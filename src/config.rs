use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;

#[derive(Parser, Clone)]
#[command(name = "golden-palace-reservations", about = "Golden Palace reservation API")]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value_t = 4000)]
    pub port: u16,

    /// Comma separated list of origins allowed to call the API.
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    #[clap(env, long)]
    pub database_url: String,

    #[clap(env, long, default_value_t = 8)]
    pub database_pool_size: u32,

    /// How long a request waits for a database connection before failing.
    #[clap(env, long, default_value_t = 5)]
    pub database_connect_timeout_secs: u64,

    #[clap(env, long, default_value = "smtp.gmail.com")]
    pub email_host: String,

    #[clap(env, long, default_value_t = 587)]
    pub email_port: u16,

    /// Implicit TLS (port 465 style) instead of STARTTLS.
    #[clap(env, long)]
    pub email_secure: bool,

    #[clap(env, long)]
    pub email_user: Option<String>,

    #[clap(env, long, hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Receives new reservation notifications, defaults to EMAIL_USER.
    #[clap(env, long)]
    pub restaurant_email: Option<String>,
}

impl Config {
    pub fn cors_origins(&self) -> anyhow::Result<Vec<HeaderValue>> {
        self.origin_urls
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid origin in ORIGIN_URLS: {}", origin))
            })
            .collect()
    }

    /// Mail settings, or `None` when sender credentials are missing and
    /// reservation emails should be skipped.
    pub fn mail_config(&self) -> Option<MailConfig> {
        let username = self.email_user.clone().filter(|u| !u.trim().is_empty())?;
        let password = self.email_pass.clone().filter(|p| !p.is_empty())?;
        let restaurant_recipient = self
            .restaurant_email
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| username.clone());

        Some(MailConfig {
            host: self.email_host.clone(),
            port: self.email_port,
            secure: self.email_secure,
            sender: username.clone(),
            username,
            password,
            restaurant_recipient,
        })
    }
}

/// Everything the mail dispatcher needs to reach the SMTP relay.
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub restaurant_recipient: String,
}
