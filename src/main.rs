//! Kobo Vault gateway server
//!
//! Wires the in-process wallet core to the HTTP gateway:
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌───────────┐    ┌──────────┐
//! │  Config  │───▶│ WalletStore│───▶│ Services  │───▶│ Gateway  │
//! │  (YAML)  │    │ (in-RAM)   │    │(fund/xfer)│    │ (axum)   │
//! └──────────┘    └────────────┘    └───────────┘    └──────────┘
//! ```
//!
//! Wallets for every configured account are provisioned before the
//! listener starts, so the first request never races provisioning.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use kobo_vault::config::AppConfig;
use kobo_vault::funding::FundingService;
use kobo_vault::gateway::{self, AppState};
use kobo_vault::identity::StaticTokenIdentity;
use kobo_vault::logging::init_logging;
use kobo_vault::notify::TracingNotifier;
use kobo_vault::rail::{HttpRail, MockRail, PaymentRail};
use kobo_vault::retry::{RetryPolicy, retry_bounded};
use kobo_vault::transfer::TransferOrchestrator;
use kobo_vault::wallet::{AccountId, WalletStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn build_rail(config: &AppConfig) -> anyhow::Result<Arc<dyn PaymentRail>> {
    if config.rail.mock {
        #[cfg(feature = "mock-rail")]
        {
            info!("payment rail: in-process mock");
            return Ok(Arc::new(MockRail::new()));
        }
        #[cfg(not(feature = "mock-rail"))]
        anyhow::bail!("config requests the mock rail but the mock-rail feature is disabled");
    }
    let rail = HttpRail::new(
        config.rail.base_url.clone(),
        config.rail.secret_key.clone(),
        Duration::from_secs(config.rail.timeout_secs),
    )
    .context("building payment rail client")?;
    info!(base_url = %config.rail.base_url, "payment rail: live gateway");
    Ok(Arc::new(rail))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _guard = init_logging(&config);
    info!(env = %env, git_hash = env!("GIT_HASH"), "starting kobo-vault");

    let store = Arc::new(WalletStore::new());
    let rail = build_rail(&config)?;

    let identity = Arc::new(StaticTokenIdentity::new());
    for account in &config.accounts {
        let id = AccountId::from(account.account_id.as_str());
        identity.insert(account.token.clone(), id.clone());
        identity.set_email(id, account.email.clone());
    }

    let notifier = Arc::new(TracingNotifier);
    let transfers = Arc::new(TransferOrchestrator::new(
        store.clone(),
        rail.clone(),
        config.fees,
        notifier.clone(),
    ));
    let funding = Arc::new(FundingService::new(
        store.clone(),
        rail.clone(),
        identity.clone(),
        config.fees,
        notifier.clone(),
    ));

    // Provision a wallet per configured account up front. Account-number
    // allocation can transiently contend, hence the bounded retry.
    for account in identity.accounts() {
        let snapshot = retry_bounded(RetryPolicy::default(), || async {
            store.create_wallet(&account)
        })
        .await
        .with_context(|| format!("provisioning wallet for {account}"))?;
        info!(
            account = %snapshot.account_id,
            account_number = %snapshot.account_number,
            "wallet provisioned"
        );
    }

    let state = AppState {
        store,
        funding,
        transfers,
        rail,
        identity,
    };

    gateway::run_server(&config.gateway.host, config.gateway.port, state)
        .await
        .context("gateway server exited")?;
    Ok(())
}
