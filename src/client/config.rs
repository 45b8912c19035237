use std::time::Duration;

use secrecy::SecretSlice;

use crate::client::consts::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_ADDRESS, SERVER_ADDRESS_ENV};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("server address is empty")]
    EmptyAddress,
    #[error("client certificate was provided without a client key")]
    MissingClientKey,
    #[error("client key was provided without a client certificate")]
    MissingClientCertificate,
}

/// PEM certificate chain and private key presented for mutual TLS.
pub struct ClientIdentity {
    certificate: Vec<u8>,
    key: SecretSlice<u8>,
}

impl ClientIdentity {
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    pub fn key(&self) -> &SecretSlice<u8> {
        &self.key
    }
}

pub struct Config {
    server_address: String,
    insecure: bool,
    server_certificate: Option<Vec<u8>>,
    client_identity: Option<ClientIdentity>,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

pub struct ConfigBuilder {
    config: Config,
    client_certificate: Option<Vec<u8>>,
    client_key: Option<SecretSlice<u8>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            client_certificate: None,
            client_key: None,
        }
    }

    /// `host:port`, or a full `http://`/`https://` URI.
    pub fn with_server_address(mut self, server_address: &str) -> Self {
        self.config.server_address = server_address.to_string();
        self
    }

    /// Disables transport security. Use only for servers without TLS.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.config.insecure = insecure;
        self
    }

    /// PEM root certificate used to validate the server, e.g. a self-signed one.
    pub fn with_server_certificate(mut self, pem: &[u8]) -> Self {
        self.config.server_certificate = Some(pem.to_vec());
        self
    }

    /// PEM certificate presented by this client for mutual TLS. Requires
    /// [`with_client_key`](Self::with_client_key).
    pub fn with_client_certificate(mut self, pem: &[u8]) -> Self {
        self.client_certificate = Some(pem.to_vec());
        self
    }

    pub fn with_client_key(mut self, pem: &[u8]) -> Self {
        self.client_key = Some(SecretSlice::from(pem.to_vec()));
        self
    }

    /// Deadline for unary requests. `Duration::ZERO` disables it. Streams are
    /// never subject to this timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = self.config;
        if config.server_address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        config.client_identity = match (self.client_certificate, self.client_key) {
            (Some(certificate), Some(key)) => Some(ClientIdentity { certificate, key }),
            (Some(_), None) => return Err(ConfigError::MissingClientKey),
            (None, Some(_)) => return Err(ConfigError::MissingClientCertificate),
            (None, None) => None,
        };
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Sets the default values.
    pub fn new() -> Self {
        Self {
            server_address: std::env::var(SERVER_ADDRESS_ENV)
                .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string()),
            insecure: false,
            server_certificate: None,
            client_identity: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: None,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn server_certificate(&self) -> Option<&[u8]> {
        self.server_certificate.as_deref()
    }

    pub fn client_identity(&self) -> Option<&ClientIdentity> {
        self.client_identity.as_ref()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
