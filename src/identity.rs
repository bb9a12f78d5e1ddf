//! Identity seam
//!
//! Credential issuance and verification live in an external identity
//! service; the gateway only needs a bearer token resolved to an account id.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::wallet::AccountId;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to the caller's account, if valid
    async fn resolve(&self, bearer_token: &str) -> Option<AccountId>;

    /// Contact address for the account, used by the payment rail's checkout
    async fn email_of(&self, account: &AccountId) -> Option<String>;
}

/// Static token map for dev and tests
pub struct StaticTokenIdentity {
    tokens: DashMap<String, AccountId>,
    emails: DashMap<AccountId, String>,
}

impl StaticTokenIdentity {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            emails: DashMap::new(),
        }
    }

    pub fn insert(&self, token: impl Into<String>, account: AccountId) {
        self.tokens.insert(token.into(), account);
    }

    pub fn set_email(&self, account: AccountId, email: impl Into<String>) {
        self.emails.insert(account, email.into());
    }

    pub fn accounts(&self) -> Vec<AccountId> {
        self.tokens.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for StaticTokenIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn resolve(&self, bearer_token: &str) -> Option<AccountId> {
        self.tokens.get(bearer_token).map(|e| e.value().clone())
    }

    async fn email_of(&self, account: &AccountId) -> Option<String> {
        match self.emails.get(account) {
            Some(e) => Some(e.value().clone()),
            None => Some(format!("{}@wallet.local", account)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolution() {
        let identity = StaticTokenIdentity::new();
        identity.insert("tok-1", AccountId::from("acct-1"));

        assert_eq!(
            identity.resolve("tok-1").await,
            Some(AccountId::from("acct-1"))
        );
        assert_eq!(identity.resolve("tok-2").await, None);
    }
}
