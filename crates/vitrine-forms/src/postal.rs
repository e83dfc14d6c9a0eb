// File: src/postal.rs
// Purpose: Postal-code (CEP) lookup used to pre-fill address fields

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use vitrine_validation::digits_only;

use crate::error::{FormError, LookupError};
use crate::orchestrator::{FormOrchestrator, LookupApplied};

/// Address returned for a postal code, in the ViaCEP field naming
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "cep", default)]
    pub postal_code: String,

    #[serde(rename = "logradouro", default)]
    pub street: String,

    #[serde(rename = "bairro", default)]
    pub neighborhood: String,

    #[serde(rename = "localidade", default)]
    pub city: String,

    #[serde(rename = "uf", default)]
    pub state: String,
}

/// A lookup the rendering layer should fire after a blur.
///
/// Requests are independent: a second blur starts a second request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalLookupRequest {
    pub field_id: String,
    /// Exactly 8 digits
    pub postal_code: String,
}

/// Parses a ViaCEP JSON body. `Ok(None)` means the service does not know
/// the code (`"erro": true`).
pub fn parse_viacep(body: &str) -> Result<Option<PostalAddress>, LookupError> {
    let value: Value = serde_json::from_str(body)?;

    // Older responses send a boolean, newer ones the string "true"
    let not_found = match value.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag == "true",
        _ => false,
    };
    if not_found {
        return Ok(None);
    }

    let mut address: PostalAddress = serde_json::from_value(value)?;
    address.postal_code = digits_only(&address.postal_code);
    Ok(Some(address))
}

/// Resolves postal codes to addresses
#[async_trait]
pub trait PostalLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Result<Option<PostalAddress>, LookupError>;
}

/// Runs `request` against `lookup` and applies the outcome to `form`.
///
/// Holds the form for the whole round trip, so interactive front ends
/// should fire the lookup themselves and call
/// [`FormOrchestrator::apply_lookup`] when it resolves.
pub async fn enrich<L: PostalLookup + ?Sized>(
    form: &mut FormOrchestrator,
    lookup: &L,
    request: &PostalLookupRequest,
) -> Result<LookupApplied, FormError> {
    debug!("Looking up postal code {}", request.postal_code);
    let outcome = lookup.lookup(&request.postal_code).await;
    form.apply_lookup(request, outcome)
}

#[cfg(feature = "viacep")]
pub use viacep::ViaCepClient;

#[cfg(feature = "viacep")]
mod viacep {
    use super::*;

    const VIACEP_URL: &str = "https://viacep.com.br";

    /// HTTP client for the public ViaCEP service. No retry, no cache.
    #[derive(Debug, Clone)]
    pub struct ViaCepClient {
        http: reqwest::Client,
        base_url: String,
    }

    impl ViaCepClient {
        pub fn new() -> Self {
            Self::with_base_url(VIACEP_URL)
        }

        pub fn with_base_url(base_url: impl Into<String>) -> Self {
            Self {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }
        }

        pub fn url_for(&self, postal_code: &str) -> String {
            format!("{}/ws/{}/json/", self.base_url, postal_code)
        }
    }

    impl Default for ViaCepClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PostalLookup for ViaCepClient {
        async fn lookup(&self, postal_code: &str) -> Result<Option<PostalAddress>, LookupError> {
            let digits = digits_only(postal_code);
            if digits.len() != 8 {
                return Err(LookupError::InvalidPostalCode(postal_code.to_string()));
            }

            let body = self
                .http
                .get(self.url_for(&digits))
                .send()
                .await
                .map_err(|e| LookupError::Transport(e.to_string()))?
                .text()
                .await
                .map_err(|e| LookupError::Transport(e.to_string()))?;

            parse_viacep(&body)
        }
    }
}
