//! Gateway configuration

/// PayPal environment
///
/// Selects the fixed, versioned API root every call resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Sandbox environment for testing
    Sandbox,
    /// Live environment
    Live,
}

impl Environment {
    /// The versioned API root for this environment
    pub fn api_base(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-m.sandbox.paypal.com/v1",
            Self::Live => "https://api-m.paypal.com/v1",
        }
    }

    /// Settings key under which this environment's webhook id is stored
    pub fn webhook_id_key(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox_webhook_id",
            Self::Live => "live_webhook_id",
        }
    }
}

/// PayPal gateway configuration
///
/// Three host-facing fields: environment mode plus the REST app
/// credentials. The client secret is redacted from `Debug` output.
#[derive(Clone)]
pub struct PaypalConfig {
    /// Environment mode
    pub environment: Environment,
    /// REST app client id
    pub client_id: String,
    /// REST app client secret
    pub client_secret: String,
    api_base_override: Option<String>,
}

impl PaypalConfig {
    /// Create a new configuration
    pub fn new(
        environment: Environment,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_override: None,
        }
    }

    /// Override the API root, e.g. to point at a local mock server in tests
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base_override = Some(base.into());
        self
    }

    /// The API root calls resolve against
    pub fn api_base(&self) -> &str {
        self.api_base_override
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base())
    }
}

impl std::fmt::Debug for PaypalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalConfig")
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
