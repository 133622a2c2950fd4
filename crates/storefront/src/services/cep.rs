//! ViaCEP client for postal code lookup.
//!
//! Resolves a Brazilian CEP into a street address using the public
//! ViaCEP API. The checkout address step uses this to pre-fill the
//! street, neighborhood, city and state fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dona_onca_core::Cep;

/// Request timeout for CEP lookups.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when resolving a CEP.
#[derive(Debug, Error)]
pub enum CepError {
    /// CEP has an invalid format.
    #[error("invalid CEP: {0}")]
    InvalidCep(#[from] dona_onca_core::CepError),

    /// CEP is well-formed but does not exist.
    #[error("CEP not found: {0}")]
    NotFound(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Address data returned by a CEP lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepAddress {
    pub cep: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// ViaCEP API client.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl CepClient {
    /// Create a new CEP lookup client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a CEP into an address.
    ///
    /// # Errors
    ///
    /// Returns `CepError::InvalidCep` if the input is not a valid CEP.
    /// Returns `CepError::NotFound` if the provider doesn't know the CEP.
    pub async fn lookup(&self, raw: &str) -> Result<CepAddress, CepError> {
        let cep = Cep::parse(raw)?;

        let url = format!("{}/ws/{}/json/", self.base_url, cep.as_str());
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // ViaCEP answers 400 for malformed input it doesn't like.
        if !status.is_success() {
            return Err(CepError::NotFound(cep.formatted()));
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| CepError::Parse(e.to_string()))?;

        // Unknown CEPs come back as 200 with an "erro" marker.
        if body.erro.is_some() {
            return Err(CepError::NotFound(cep.formatted()));
        }

        Ok(CepAddress {
            cep: cep.formatted(),
            street: body.logradouro.unwrap_or_default(),
            neighborhood: body.bairro.unwrap_or_default(),
            city: body.localidade.unwrap_or_default(),
            state: body.uf.unwrap_or_default(),
        })
    }
}

/// Raw ViaCEP response.
///
/// The `erro` field is a bool in older deployments and the string
/// `"true"` in newer ones, so it is kept opaque.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    erro: Option<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_marker_is_detected_as_bool_or_string() {
        let as_bool: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(as_bool.erro.is_some());

        let as_string: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(as_string.erro.is_some());
    }

    #[test]
    fn full_response_parses() {
        let json = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;
        let body: ViaCepResponse = serde_json::from_str(json).unwrap();
        assert!(body.erro.is_none());
        assert_eq!(body.localidade.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn invalid_cep_fails_before_any_request() {
        let client = CepClient::new("https://viacep.com.br").unwrap();
        let err = tokio_test_block_on(client.lookup("123"));
        assert!(matches!(err, Err(CepError::InvalidCep(_))));
    }

    fn tokio_test_block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
