use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::GatewayError,
    protocol::{RedeemRequest, RedeemResponse},
};
use tracing::debug;
use url::Url;

use crate::HttpGateway;

/// Posts redemptions as JSON to a fixed endpoint. No retries; the only
/// time limit is the client-wide request timeout.
pub struct ReqwestGateway {
    http: Client,
    endpoint: Url,
}

impl ReqwestGateway {
    pub fn new(endpoint: Url, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build redemption HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn redeem(&self, request: &RedeemRequest) -> Result<RedeemResponse, GatewayError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = res.bytes().await.map_err(map_reqwest_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "redemption response received");
        RedeemResponse::from_slice(&body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
