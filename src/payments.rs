//! Payment bridge: order creation against the external gateway and
//! callback signature verification.
//!
//! The gateway is behind a trait so integration tests can substitute a
//! deterministic fake. Signature verification is local: HMAC-SHA256 over
//! `order_ref|payment_ref` with the gateway key secret, hex encoded, and
//! compared in constant time.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::crypto::{constant_time_eq, hmac_sha256};

#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_ref: String,
    pub amount_paise: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder>;
}

pub struct RazorpayGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.payment_api_url.trim_end_matches('/').to_string(),
            key_id: config.payment_key_id.clone(),
            key_secret: config.payment_key_secret.clone(),
        }
    }
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": amount_paise,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .context("payment gateway request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "payment gateway rejected order creation with status {status}: {body}"
            ));
        }

        let order: OrderResponse = response
            .json()
            .await
            .context("payment gateway returned an unparseable order")?;

        Ok(GatewayOrder {
            order_ref: order.id,
            amount_paise: order.amount,
            currency: order.currency,
        })
    }
}

/// Signature the gateway is expected to send for a captured payment.
pub fn payment_signature(key_secret: &str, order_ref: &str, payment_ref: &str) -> String {
    let payload = format!("{order_ref}|{payment_ref}");
    hex::encode(hmac_sha256(key_secret.as_bytes(), payload.as_bytes()))
}

/// Verify a client-supplied callback signature. Returns false on any
/// mismatch; the caller must not touch the ledger in that case.
pub fn verify_payment_signature(
    key_secret: &str,
    order_ref: &str,
    payment_ref: &str,
    signature: &str,
) -> bool {
    let expected = payment_signature(key_secret, order_ref, payment_ref);
    constant_time_eq(expected.as_bytes(), signature.trim().as_bytes())
}
