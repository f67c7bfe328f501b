//! Read-only vault dashboard for the terminal.
//!
//! Usage: CREDIT_VAULT_ADDRESS=0x... vault-feed [--watch]

use std::sync::Arc;

use anyhow::Context;
use credit_vault_client::helpers::format::{format_amount, shorten_address, shorten_hash};
use credit_vault_client::{
    FeedFilter, RpcVaultGateway, TransactionFeed, VaultClientConfig, VaultMetrics, VaultStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LATEST_RECORDS: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let watch = std::env::args().skip(1).any(|arg| arg == "--watch");

    let config = VaultClientConfig::from_env().context("failed to load configuration")?;
    let gateway = Arc::new(RpcVaultGateway::read_only(&config).context("failed to connect to RPC")?);
    let symbol = config.chain.native_currency.symbol.clone();

    let store = Arc::new(VaultStore::new(Arc::clone(&gateway)));
    store
        .refresh_snapshot()
        .await
        .context("failed to read vault snapshot")?;
    print_metrics(&store.metrics().await, &symbol);

    let mut feed = TransactionFeed::new(gateway, config.reconciliation);
    match feed.refresh().await {
        Ok(_) => {
            let summary = feed.summary();
            println!();
            println!(
                "Activity (last {} blocks): {} records, {} deposits, {} withdrawals, {} harvests, {} rebalances",
                config.reconciliation.window_blocks(),
                summary.total,
                summary.deposits,
                summary.withdrawals,
                summary.harvests,
                summary.rebalances,
            );
            println!("Volume: {} {}", format_amount(Some(summary.volume), 4), symbol);

            for tx in feed.filtered(&FeedFilter::All).iter().take(LATEST_RECORDS) {
                let user = tx.user().map(|u| shorten_address(&u)).unwrap_or_default();
                println!(
                    "  #{:<10} {:<10} {:>14} {} {}  {}",
                    tx.block_number,
                    format!("{:?}", tx.kind),
                    format_amount(Some(tx.amount), 4),
                    symbol,
                    user,
                    shorten_hash(&tx.tx_hash),
                );
            }
        }
        Err(err) => eprintln!("Activity unavailable: {}", err.user_message()),
    }

    if !watch {
        return Ok(());
    }

    let poller = store.spawn_polling(config.poll_interval);
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let metrics = store.metrics().await;
                info!(
                    tvl = %format_amount(metrics.tvl, 4),
                    share_price = metrics.share_price,
                    apy = metrics.estimated_apy,
                    "vault snapshot"
                );
            }
        }
    }

    poller.abort();
    info!("stopped");
    Ok(())
}

fn print_metrics(metrics: &VaultMetrics, symbol: &str) {
    println!("TVL:             {} {}", format_amount(metrics.tvl, 4), symbol);
    println!("Share price:     {:.6}", metrics.share_price);
    println!("Estimated APY:   {:.2}%", metrics.estimated_apy);
    println!("Pending rewards: {} {}", format_amount(metrics.total_pending_rewards, 6), symbol);
    println!("Total harvested: {} {}", format_amount(metrics.total_harvested, 4), symbol);
    match metrics.last_harvest_block {
        Some(block) => println!("Last harvest:    #{}", block),
        None => println!("Last harvest:    -"),
    }

    for view in &metrics.strategies {
        let weight = view
            .weight_bps
            .map(|w| format!("{:.1}%", w as f64 / 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} risk {:<12} weight {:>6}  {:>14} {} ({:.1}% of TVL)  apy {:.2}%",
            view.name,
            view.risk,
            weight,
            format_amount(view.allocation, 4),
            symbol,
            view.pct_of_tvl,
            view.apy,
        );
    }
}
