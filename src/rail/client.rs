//! HTTP payment-rail client
//!
//! Talks to the gateway's REST API with a bearer secret. All responses use
//! the gateway's `{ status, message, data }` envelope. Request timeouts map
//! to `RailError::Timeout` so callers treat them as indeterminate.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    Bank, BankDestination, InitiatedPayment, PaymentRail, PayoutReceipt, RailError,
    ResolvedAccount, VerifiedPayment,
};
use crate::money::Kobo;
use crate::reference::Reference;

/// Gateway response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitiateData {
    authorization_url: String,
    #[serde(alias = "id")]
    transaction_id: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    #[serde(alias = "id")]
    transaction_id: String,
    reference: String,
    /// Kobo, as the gateway reports it
    amount: Kobo,
    status: String,
    paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct PayoutData {
    #[serde(alias = "transfer_code")]
    payout_id: String,
}

#[derive(Debug, Deserialize)]
struct ResolveData {
    account_name: String,
    #[serde(default)]
    bank_name: String,
}

#[derive(Debug, Deserialize)]
struct BankData {
    name: String,
    code: String,
}

pub struct HttpRail {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpRail {
    pub fn new(base_url: String, secret_key: String, timeout: Duration) -> Result<Self, RailError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RailError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            secret_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, RailError> {
        let resp = req
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        let envelope: Envelope<T> = resp.json().await.map_err(map_reqwest_error)?;

        if !status.is_success() || !envelope.status {
            warn!(%status, message = %envelope.message, "rail request rejected");
            return Err(RailError::Rejected(envelope.message));
        }
        envelope
            .data
            .ok_or_else(|| RailError::Network("missing data in rail response".into()))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RailError {
    if e.is_timeout() {
        RailError::Timeout
    } else {
        RailError::Network(e.to_string())
    }
}

#[async_trait]
impl PaymentRail for HttpRail {
    async fn initiate_payment(
        &self,
        reference: &Reference,
        amount: Kobo,
        account_email: &str,
    ) -> Result<InitiatedPayment, RailError> {
        debug!(%reference, amount, "initiating payment");
        let data: InitiateData = self
            .send(self.http.post(self.url("/transaction/initialize")).json(
                &serde_json::json!({
                    "reference": reference.as_str(),
                    "amount": amount,
                    "email": account_email,
                }),
            ))
            .await?;
        Ok(InitiatedPayment {
            payment_url: data.authorization_url,
            gateway_txn_id: data.transaction_id,
        })
    }

    async fn verify_payment(&self, gateway_txn_id: &str) -> Result<VerifiedPayment, RailError> {
        debug!(gateway_txn_id, "verifying payment");
        let data: VerifyData = self
            .send(
                self.http
                    .get(self.url(&format!("/transaction/verify/{}", gateway_txn_id))),
            )
            .await?;
        Ok(VerifiedPayment {
            gateway_txn_id: data.transaction_id,
            reference: data.reference,
            amount: data.amount,
            succeeded: data.status == "success",
            paid_at: data.paid_at,
        })
    }

    async fn submit_payout(
        &self,
        destination: &BankDestination,
        amount: Kobo,
        reference: &Reference,
    ) -> Result<PayoutReceipt, RailError> {
        debug!(%reference, amount, bank = %destination.bank_code, "submitting payout");
        let data: PayoutData = self
            .send(self.http.post(self.url("/transfer")).json(&serde_json::json!({
                "reference": reference.as_str(),
                "amount": amount,
                "account_number": destination.account_number,
                "bank_code": destination.bank_code,
                "account_name": destination.account_name,
            })))
            .await?;
        Ok(PayoutReceipt {
            payout_id: data.payout_id,
        })
    }

    async fn resolve_account(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<ResolvedAccount, RailError> {
        let result: Result<ResolveData, RailError> = self
            .send(self.http.get(self.url("/bank/resolve")).query(&[
                ("account_number", account_number),
                ("bank_code", bank_code),
            ]))
            .await;
        match result {
            Ok(data) => Ok(ResolvedAccount {
                account_name: data.account_name,
                bank_name: data.bank_name,
            }),
            // The gateway reports unknown accounts as a rejection; surface
            // them as unresolvable so callers can fail fast.
            Err(RailError::Rejected(msg)) => Err(RailError::Unresolved(msg)),
            Err(e) => Err(e),
        }
    }

    async fn list_banks(&self) -> Result<Vec<Bank>, RailError> {
        let data: Vec<BankData> = self.send(self.http.get(self.url("/bank"))).await?;
        Ok(data
            .into_iter()
            .map(|b| Bank {
                name: b.name,
                code: b.code,
            })
            .collect())
    }
}
