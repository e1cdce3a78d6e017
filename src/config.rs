use crate::application::booking_session::DEFAULT_CURRENCY;
use crate::domain::ports::PaymentGatewayBox;
use crate::error::{BookingError, Result};
use crate::infrastructure::razorpay::{DEFAULT_BASE_URL, RazorpayGateway};
use crate::infrastructure::sandbox_gateway::SandboxGateway;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Largest accepted request body; booking forms may carry a video.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Shortest sandbox signing secret accepted.
pub const MIN_SANDBOX_SECRET_LEN: usize = 16;

/// Server settings. Every flag can also be provided through the environment.
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory uploaded booking videos are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Append-only log of captured leads and tracked downloads
    #[arg(long, env = "LEAD_LOG", default_value = "user_data.log")]
    pub lead_log: PathBuf,

    /// URL returned to visitors after they leave their details
    #[arg(long, env = "DOWNLOAD_URL", default_value = "/downloads/storytelling-guide.pdf")]
    pub download_url: String,

    /// Razorpay key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: Option<String>,

    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: Option<String>,

    #[arg(long, env = "RAZORPAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub razorpay_base_url: String,

    /// Use the local sandbox gateway instead of Razorpay. Never for production.
    #[arg(long, env = "SANDBOX_GATEWAY")]
    pub sandbox: bool,

    /// Secret the sandbox gateway signs confirmations with; required with `--sandbox`
    #[arg(long, env = "SANDBOX_SECRET", hide_env_values = true)]
    pub sandbox_secret: Option<String>,

    /// Directory the free media-kit PDFs are served from
    #[arg(long, env = "MEDIA_KIT_DIR", default_value = "mediakit")]
    pub media_kit_dir: PathBuf,

    /// Currency gateway orders are created in
    #[arg(long, env = "CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// The Razorpay key pair, when both halves are configured.
    pub fn razorpay_credentials(&self) -> Option<(&str, &str)> {
        match (&self.razorpay_key_id, &self.razorpay_key_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }

    /// Builds the configured gateway.
    ///
    /// Razorpay when its key pair is set; the sandbox only when explicitly
    /// requested with a strong secret. Anything else is a startup error.
    pub fn payment_gateway(&self) -> Result<PaymentGatewayBox> {
        if let Some((key_id, key_secret)) = self.razorpay_credentials() {
            let gateway = RazorpayGateway::new(&self.razorpay_base_url, key_id, key_secret)?;
            tracing::info!(base_url = %self.razorpay_base_url, "using Razorpay gateway");
            return Ok(Box::new(gateway));
        }

        if !self.sandbox {
            return Err(BookingError::ConfigError(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET are required (or pass --sandbox for local development)"
                    .to_string(),
            ));
        }

        let secret = self.sandbox_secret.as_deref().unwrap_or_default().trim();
        if secret.len() < MIN_SANDBOX_SECRET_LEN {
            return Err(BookingError::ConfigError(format!(
                "--sandbox requires SANDBOX_SECRET of at least {MIN_SANDBOX_SECRET_LEN} characters"
            )));
        }

        tracing::warn!("using the sandbox payment gateway; payments are not real");
        Ok(Box::new(SandboxGateway::new(secret)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::GatewayConfirmation;
    use crate::domain::signature;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ServerConfig,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.config.bind.port(), 8000);
        assert_eq!(cli.config.currency, "INR");
        assert!(cli.config.db_path.is_none());
    }

    #[test]
    fn test_razorpay_credentials_need_both_halves() {
        let cli = TestCli::try_parse_from(["test", "--razorpay-key-id", "rzp_test_1"]).unwrap();
        assert!(cli.config.razorpay_credentials().is_none());

        let cli = TestCli::try_parse_from([
            "test",
            "--razorpay-key-id",
            "rzp_test_1",
            "--razorpay-key-secret",
            "shh",
        ])
        .unwrap();
        assert_eq!(cli.config.razorpay_credentials(), Some(("rzp_test_1", "shh")));
        assert_eq!(cli.config.payment_gateway().unwrap().key_id(), "rzp_test_1");
    }

    #[test]
    fn test_default_config_has_no_gateway() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert!(!cli.config.sandbox);
        assert!(cli.config.sandbox_secret.is_none());
        assert!(matches!(
            cli.config.payment_gateway(),
            Err(BookingError::ConfigError(_))
        ));
    }

    #[test]
    fn test_sandbox_requires_strong_secret() {
        for args in [
            vec!["test", "--sandbox"],
            vec!["test", "--sandbox", "--sandbox-secret", "sandbox_secret"],
            vec!["test", "--sandbox", "--sandbox-secret", "                    "],
        ] {
            let cli = TestCli::try_parse_from(args).unwrap();
            assert!(matches!(
                cli.config.payment_gateway(),
                Err(BookingError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_sandbox_rejects_guessable_signatures() {
        let cli = TestCli::try_parse_from([
            "test",
            "--sandbox",
            "--sandbox-secret",
            "k3v9-local-only-Xq72",
        ])
        .unwrap();
        let gateway = cli.config.payment_gateway().unwrap();

        for guess in ["sandbox_secret", "sandbox", ""] {
            let forged = GatewayConfirmation {
                order_id: "order_abc".to_string(),
                payment_id: "pay_fake".to_string(),
                signature: signature::sign(guess, "order_abc", "pay_fake").unwrap(),
            };
            assert!(matches!(
                gateway.verify(&forged),
                Err(BookingError::PaymentVerificationFailed(_))
            ));
        }

        let genuine = GatewayConfirmation {
            order_id: "order_abc".to_string(),
            payment_id: "pay_1".to_string(),
            signature: signature::sign("k3v9-local-only-Xq72", "order_abc", "pay_1").unwrap(),
        };
        assert!(gateway.verify(&genuine).is_ok());
    }
}
