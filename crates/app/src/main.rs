use std::sync::Arc;
use std::time::Duration;

use engine::{Ledger, MemoryStore, MoneyPaise, User};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kanakku={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::builder().shared_store(store).build()?;

    if let Some(seed) = &settings.seed {
        let members: Vec<User> = seed
            .iter()
            .map(|member| {
                User::new(
                    member.id.clone(),
                    member.name.clone(),
                    MoneyPaise::new(member.balance_paise),
                    member.role,
                )
            })
            .collect();
        if !ledger.seed_users(&members).await? {
            tracing::info!("family members already present, skipping seed");
        }
    }

    {
        let ledger = ledger.clone();
        let bind = settings
            .server
            .bind
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let addr = format!("{}:{}", bind, settings.server.port);
        tasks.spawn(async move {
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(ledger, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    if let Some(reconciliation) = &settings.reconciliation {
        let ledger = ledger.clone();
        let interval = Duration::from_secs(reconciliation.interval_minutes * 60);
        tasks.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup stays quiet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match ledger.recompute_balances().await {
                    Ok(corrected) if corrected.is_empty() => {
                        tracing::debug!("balances consistent with the transaction set");
                    }
                    Ok(corrected) => {
                        tracing::warn!("corrected {} drifted balances", corrected.len());
                    }
                    Err(err) => tracing::error!("reconciliation failed: {err}"),
                }
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}
