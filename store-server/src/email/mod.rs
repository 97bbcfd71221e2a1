//! Transactional email via AWS SES

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SES-backed mailer
///
/// All sends are fire-and-forget from the caller's perspective: failures
/// are logged and never roll back the state change that triggered them.
#[derive(Clone)]
pub struct Mailer {
    ses: SesClient,
    from: String,
    client_url: String,
}

impl Mailer {
    pub fn new(ses: SesClient, from: String, client_url: String) -> Self {
        Self {
            ses,
            from,
            client_url,
        }
    }

    async fn send(&self, to: &str, subject: &str, body_text: String) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;
        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();
        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;
        Ok(())
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), BoxError> {
        let body = format!(
            "Your verification code is: {code}\n\
             Valid for 5 minutes.\n\n\
             If you did not create an account, please ignore this email."
        );
        self.send(to, "Your verification code", body).await?;
        tracing::info!(to = to, "Verification code sent");
        Ok(())
    }

    pub async fn send_password_reset_code(&self, to: &str, code: &str) -> Result<(), BoxError> {
        let body = format!(
            "Your password reset code is: {code}\n\
             Valid for 5 minutes.\n\n\
             If you did not request a reset, please ignore this email and \
             your password will remain unchanged."
        );
        self.send(to, "Reset your password", body).await?;
        tracing::info!(to = to, "Password reset code sent");
        Ok(())
    }

    pub async fn send_payment_confirmation(
        &self,
        to: &str,
        order_id: &str,
        payment_method: &str,
        amount: f64,
    ) -> Result<(), BoxError> {
        let paid_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
        let body = format!(
            "Thank you for your payment. Your order has been confirmed.\n\n\
             Order ID: {order_id}\n\
             Payment date: {paid_at}\n\
             Payment method: {payment_method}\n\
             Total amount paid: ${amount:.2}\n\n\
             You can review your order at {}/orders/{order_id}",
            self.client_url
        );
        self.send(to, "Payment confirmation", body).await?;
        tracing::info!(to = to, order_id = order_id, "Payment confirmation sent");
        Ok(())
    }
}
