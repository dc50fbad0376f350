//! Payment authorization gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_cart::LineItem;

use crate::error::GatewayError;

/// Default payment-authorization endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://mock-api-gateway.example.com/order-quota";

/// Body of a payment authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Full cart contents.
    pub cart: Vec<LineItem>,
    /// Name of the chosen payment method.
    pub payment_method: String,
}

impl PaymentRequest {
    /// Create a new request.
    pub fn new(cart: Vec<LineItem>, payment_method: impl Into<String>) -> Self {
        Self {
            cart,
            payment_method: payment_method.into(),
        }
    }
}

/// Body of a successful-transport response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Whether the payment was accepted. Missing means rejected.
    #[serde(default)]
    pub success: bool,
    /// Optional detail, shown to the user on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentResponse {
    /// An accepted payment.
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A rejected payment with a reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// The external payment-authorization service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Send one authorization request.
    ///
    /// `Ok` means the transport succeeded; the business result is in
    /// [`PaymentResponse::success`].
    async fn authorize(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError>;
}

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Endpoint receiving the JSON POST.
    pub endpoint: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Total request timeout.
    pub timeout: Duration,
    /// Bearer token, if the endpoint requires one.
    pub api_token: Option<String>,
}

impl GatewayConfig {
    /// Create a config for an endpoint with default timeouts.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set both timeouts from a single total.
    pub fn with_timeout(mut self, total: Duration) -> Self {
        self.connect_timeout = total / 4;
        self.timeout = total;
        self
    }

    /// Set the bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            api_token: None,
        }
    }
}

/// A unique key identifying one payment attempt.
///
/// Sent as the `Idempotency-Key` header so the service can recognise a
/// repeated delivery of the same attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("pay_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JSON-over-HTTP payment gateway.
///
/// Requests are never retried automatically.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Build a gateway client.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn classify(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.config.timeout)
        } else if err.is_connect() {
            GatewayError::Connection(err.to_string())
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn authorize(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError> {
        let key = IdempotencyKey::generate();
        tracing::debug!(
            endpoint = %self.config.endpoint,
            idempotency_key = %key,
            method = %request.payment_method,
            "sending payment request"
        );

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header("Idempotency-Key", key.as_str())
            .json(request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await.map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                url: self.config.endpoint.clone(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
