use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, RedeemRequestError};

/// Body of the redemption POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    #[serde(rename = "codigo_barras")]
    code: String,
}

impl RedeemRequest {
    /// Trims surrounding whitespace (line terminators included) and rejects
    /// what is left if it is empty.
    pub fn new(raw: &str) -> Result<Self, RedeemRequestError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(RedeemRequestError::EmptyCode);
        }
        Ok(Self {
            code: code.to_string(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl RedeemResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body).map_err(|err| GatewayError::MalformedBody(err.to_string()))
    }

    /// Server message, treating blank strings as absent.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}
