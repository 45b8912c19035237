use secrecy::ExposeSecret;
use tonic::transport::{Certificate, ClientTlsConfig, Endpoint, Identity};

use crate::client::config::Config;

pub fn endpoint_uri(config: &Config) -> String {
    let address = config.server_address().trim();
    if address.contains("://") {
        return address.to_string();
    }
    let scheme = if config.insecure() { "http" } else { "https" };
    format!("{}://{}", scheme, address)
}

pub fn build_endpoint(config: &Config) -> Result<Endpoint, tonic::transport::Error> {
    let mut endpoint = Endpoint::from_shared(endpoint_uri(config))?;
    if let Some(timeout) = config.connect_timeout() {
        endpoint = endpoint.connect_timeout(timeout);
    }
    if config.insecure() {
        return Ok(endpoint);
    }
    endpoint.tls_config(build_tls_config(config))
}

fn build_tls_config(config: &Config) -> ClientTlsConfig {
    let mut tls = ClientTlsConfig::new();
    #[cfg(feature = "native-roots")]
    {
        tls = tls.with_native_roots();
    }
    #[cfg(feature = "webpki-roots")]
    {
        tls = tls.with_webpki_roots();
    }
    if let Some(pem) = config.server_certificate() {
        tls = tls.ca_certificate(Certificate::from_pem(pem));
    }
    if let Some(identity) = config.client_identity() {
        tls = tls.identity(Identity::from_pem(
            identity.certificate(),
            identity.key().expose_secret(),
        ));
    }
    tls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_follows_insecure_flag() {
        let secure = Config::builder()
            .with_server_address("diatheke:9002")
            .build()
            .unwrap();
        assert_eq!(endpoint_uri(&secure), "https://diatheke:9002");

        let insecure = Config::builder()
            .with_server_address("diatheke:9002")
            .with_insecure(true)
            .build()
            .unwrap();
        assert_eq!(endpoint_uri(&insecure), "http://diatheke:9002");
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        let config = Config::builder()
            .with_server_address("http://10.0.0.2:9002")
            .build()
            .unwrap();
        assert_eq!(endpoint_uri(&config), "http://10.0.0.2:9002");
    }

    #[test]
    fn test_insecure_endpoint() {
        let config = Config::builder()
            .with_server_address("127.0.0.1:9002")
            .with_insecure(true)
            .build()
            .unwrap();
        let endpoint = build_endpoint(&config).unwrap();
        assert_eq!(endpoint.uri().scheme_str(), Some("http"));
        assert_eq!(endpoint.uri().port_u16(), Some(9002));
    }
}
