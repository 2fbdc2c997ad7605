use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedeemRequestError {
    #[error("barcode must not be empty")]
    EmptyCode,
}

/// Failure to obtain a usable response from the redemption endpoint.
///
/// A server that answered with `{"success": false}` is not a gateway error;
/// that is a business outcome carried by the response itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}
