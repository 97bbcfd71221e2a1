//! Application state

use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stripe credentials and redirect targets
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// SES-backed transactional mailer
    pub mailer: Mailer,
    /// Stripe configuration
    pub stripe: StripeConfig,
    /// JWT signing secret
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = aws_sdk_sesv2::Client::new(&aws_config);

        Ok(Self {
            pool,
            mailer: Mailer::new(ses, config.ses_from_email.clone(), config.client_url.clone()),
            stripe: StripeConfig {
                secret_key: config.stripe_secret_key.clone(),
                webhook_secret: config.stripe_webhook_secret.clone(),
                success_url: config.checkout_success_url.clone(),
                cancel_url: config.checkout_cancel_url.clone(),
            },
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
