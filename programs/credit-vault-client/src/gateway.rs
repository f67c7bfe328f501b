//! Typed access to the vault contract.
//!
//! `VaultGateway` is the seam every other component depends on. The RPC
//! implementation batches reads through Multicall3 with `allowFailure`, so a
//! single failing view call only blanks its own field.

use alloy::network::{Ethereum, EthereumWallet, NetworkWallet};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::{SolCall, SolEvent};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::VaultClientConfig;
use crate::errors::{ConfigError, Result, VaultClientError};
use crate::events::{ICreditVault, IMulticall3};
use crate::state::*;

/// Inclusive block range of one log query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    pub fn len(&self) -> u64 {
        self.to.saturating_sub(self.from) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }
}

/// Exactly one vault write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultWrite {
    /// depositCTC(receiver) with value = amount
    Deposit { amount: U256, receiver: Address },
    /// withdrawCTC(amount, receiver, owner)
    Withdraw {
        amount: U256,
        receiver: Address,
        owner: Address,
    },
    /// redeemCTC(shares, receiver, owner)
    Redeem {
        shares: U256,
        receiver: Address,
        owner: Address,
    },
}

impl VaultWrite {
    pub fn kind(&self) -> ActionKind {
        match self {
            VaultWrite::Deposit { .. } => ActionKind::Deposit,
            VaultWrite::Withdraw { .. } => ActionKind::Withdraw,
            VaultWrite::Redeem { .. } => ActionKind::Redeem,
        }
    }
}

#[async_trait]
pub trait VaultGateway: Send + Sync {
    /// Connected wallet, None for a read-only gateway
    fn account(&self) -> Option<Address>;

    /// One batched read of all vault-level views
    async fn read_snapshot(&self) -> Result<VaultSnapshot>;

    /// Balances of one account; convertToAssets is skipped for zero shares
    async fn read_user_position(&self, account: Address) -> Result<UserPosition>;

    /// Broadcast a write and return without waiting for inclusion
    async fn submit_write(&self, write: VaultWrite) -> Result<TxHandle>;

    /// Suspend until the transaction is mined; reverted receipts are errors
    async fn wait_for_receipt(&self, handle: TxHandle) -> Result<TxReceiptSummary>;

    async fn latest_block(&self) -> Result<u64>;

    /// Logs of one event kind emitted by the vault within `range`
    async fn fetch_logs(&self, kind: EventKind, range: BlockRange) -> Result<Vec<RawVaultLog>>;
}

// ══════════════════════════════════════════════════════════════════════════════
// RPC GATEWAY
// ══════════════════════════════════════════════════════════════════════════════

/// Gateway over an alloy provider
pub struct RpcVaultGateway<P = DynProvider> {
    provider: P,
    vault: Address,
    multicall: Address,
    account: Option<Address>,
}

impl RpcVaultGateway<DynProvider> {
    /// Reads only; writes fail with `WalletNotConnected`
    pub fn read_only(config: &VaultClientConfig) -> Result<Self> {
        let url = rpc_url(config)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        info!(chain_id = config.chain.chain_id, vault = %config.vault, "read-only gateway connected");
        Ok(Self::new(provider, config.vault, config.chain.multicall3, None))
    }

    /// Reads and writes, signing with the injected wallet
    pub fn with_wallet(config: &VaultClientConfig, wallet: EthereumWallet) -> Result<Self> {
        let url = rpc_url(config)?;
        let account = NetworkWallet::<Ethereum>::default_signer_address(&wallet);
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();
        info!(chain_id = config.chain.chain_id, vault = %config.vault, %account, "wallet gateway connected");
        Ok(Self::new(provider, config.vault, config.chain.multicall3, Some(account)))
    }
}

fn rpc_url(config: &VaultClientConfig) -> Result<Url> {
    config.chain.rpc_url.parse::<Url>().map_err(|_| {
        VaultClientError::Config(ConfigError::InvalidValue {
            name: "rpc_url",
            value: config.chain.rpc_url.clone(),
        })
    })
}

impl<P: Provider> RpcVaultGateway<P> {
    pub fn new(provider: P, vault: Address, multicall: Address, account: Option<Address>) -> Self {
        Self {
            provider,
            vault,
            multicall,
            account,
        }
    }

    /// Forget the wallet account; later writes are refused
    pub fn disconnect(&mut self) {
        if let Some(account) = self.account.take() {
            info!(%account, "wallet disconnected");
        }
    }

    pub fn vault(&self) -> Address {
        self.vault
    }

    fn call3<C: SolCall>(target: Address, call: C) -> IMulticall3::Call3 {
        IMulticall3::Call3 {
            target,
            allowFailure: true,
            callData: call.abi_encode().into(),
        }
    }

    async fn aggregate(&self, calls: Vec<IMulticall3::Call3>) -> Result<Vec<IMulticall3::Result>> {
        let count = calls.len();
        let multicall = IMulticall3::new(self.multicall, &self.provider);
        let results = multicall.aggregate3(calls).call().await?;

        #[cfg(feature = "verbose")]
        tracing::trace!(
            success = ?results.iter().map(|r| r.success).collect::<Vec<_>>(),
            "aggregate3 results"
        );

        if results.len() != count {
            warn!(expected = count, got = results.len(), "multicall returned unexpected result count");
        }
        Ok(results)
    }
}

/// Decode one sub-call result; None when it failed or returned garbage
fn decode_result<C: SolCall>(results: &[IMulticall3::Result], index: usize) -> Option<C::Return> {
    let result = results.get(index)?;
    if !result.success {
        debug!(call = C::SIGNATURE, "batched call failed");
        return None;
    }
    match C::abi_decode_returns(&result.returnData) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(call = C::SIGNATURE, %err, "batched call returned undecodable data");
            None
        }
    }
}

fn weight_bps(value: Option<U256>) -> Option<u16> {
    value.and_then(|w| u16::try_from(w).ok())
}

fn event_signature(kind: EventKind) -> B256 {
    match kind {
        EventKind::Deposit => ICreditVault::DepositedCTC::SIGNATURE_HASH,
        EventKind::Withdraw => ICreditVault::WithdrawnCTC::SIGNATURE_HASH,
        EventKind::Harvest => ICreditVault::Harvested::SIGNATURE_HASH,
        EventKind::Rebalance => ICreditVault::Rebalanced::SIGNATURE_HASH,
    }
}

/// Map an RPC log to its raw form. Undecodable payloads are kept with empty
/// arguments so the record still shows up (with zero amounts).
pub fn decode_raw_log(kind: EventKind, log: &Log) -> RawVaultLog {
    let decoded = match kind {
        EventKind::Deposit => log.log_decode::<ICreditVault::DepositedCTC>().map(|l| {
            let e = l.inner.data;
            RawEventArgs::Deposited(TransferArgs {
                sender: Some(e.sender),
                receiver: Some(e.receiver),
                assets: Some(e.assets),
                shares: Some(e.shares),
            })
        }),
        EventKind::Withdraw => log.log_decode::<ICreditVault::WithdrawnCTC>().map(|l| {
            let e = l.inner.data;
            RawEventArgs::Withdrawn(TransferArgs {
                sender: Some(e.sender),
                receiver: Some(e.receiver),
                assets: Some(e.assets),
                shares: Some(e.shares),
            })
        }),
        EventKind::Harvest => log.log_decode::<ICreditVault::Harvested>().map(|l| {
            let e = l.inner.data;
            RawEventArgs::Harvested(HarvestArgs {
                staking_reward: Some(e.stakingReward),
                lending_reward: Some(e.lendingReward),
                lp_reward: Some(e.lpReward),
                total: Some(e.total),
            })
        }),
        EventKind::Rebalance => log.log_decode::<ICreditVault::Rebalanced>().map(|l| {
            let e = l.inner.data;
            RawEventArgs::Rebalanced(RebalanceArgs {
                staking_alloc: Some(e.stakingAlloc),
                lending_alloc: Some(e.lendingAlloc),
                lp_alloc: Some(e.lpAlloc),
            })
        }),
    };

    let args = decoded.unwrap_or_else(|err| {
        warn!(event = kind.event_name(), tx = ?log.transaction_hash, %err, "undecodable vault log");
        RawEventArgs::empty(kind)
    });

    RawVaultLog {
        tx_hash: log.transaction_hash,
        block_number: log.block_number,
        args,
    }
}

#[async_trait]
impl<P: Provider + 'static> VaultGateway for RpcVaultGateway<P> {
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn read_snapshot(&self) -> Result<VaultSnapshot> {
        let v = self.vault;
        let calls = vec![
            Self::call3(v, ICreditVault::totalAssetsCall {}),
            Self::call3(v, ICreditVault::totalSupplyCall {}),
            Self::call3(v, ICreditVault::sharePriceCall {}),
            Self::call3(v, ICreditVault::getAllocationsCall {}),
            Self::call3(v, ICreditVault::getPendingRewardsCall {}),
            Self::call3(v, ICreditVault::totalHarvestedCall {}),
            Self::call3(v, ICreditVault::lastHarvestBlockCall {}),
            Self::call3(v, ICreditVault::stakingWeightCall {}),
            Self::call3(v, ICreditVault::lendingWeightCall {}),
            Self::call3(v, ICreditVault::lpWeightCall {}),
        ];
        let r = self.aggregate(calls).await?;

        let snapshot = VaultSnapshot {
            total_assets: decode_result::<ICreditVault::totalAssetsCall>(&r, 0),
            total_supply: decode_result::<ICreditVault::totalSupplyCall>(&r, 1),
            share_price: decode_result::<ICreditVault::sharePriceCall>(&r, 2),
            allocations: decode_result::<ICreditVault::getAllocationsCall>(&r, 3)
                .map(|a| StrategyAmounts::new(a.staking, a.lending, a.lp)),
            pending_rewards: decode_result::<ICreditVault::getPendingRewardsCall>(&r, 4)
                .map(|p| StrategyAmounts::new(p.staking, p.lending, p.lp)),
            total_harvested: decode_result::<ICreditVault::totalHarvestedCall>(&r, 5),
            last_harvest_block: decode_result::<ICreditVault::lastHarvestBlockCall>(&r, 6)
                .and_then(|b| u64::try_from(b).ok()),
            weights: StrategyWeights {
                staking: weight_bps(decode_result::<ICreditVault::stakingWeightCall>(&r, 7)),
                lending: weight_bps(decode_result::<ICreditVault::lendingWeightCall>(&r, 8)),
                lp: weight_bps(decode_result::<ICreditVault::lpWeightCall>(&r, 9)),
            },
        };

        let missing = snapshot.missing_fields();
        if missing > 0 {
            warn!(missing, "partial vault snapshot");
        }
        Ok(snapshot)
    }

    async fn read_user_position(&self, account: Address) -> Result<UserPosition> {
        let calls = vec![
            Self::call3(self.vault, ICreditVault::balanceOfCall { account }),
            Self::call3(self.vault, ICreditVault::maxWithdrawCall { owner: account }),
            Self::call3(self.multicall, IMulticall3::getEthBalanceCall { addr: account }),
        ];
        let r = self.aggregate(calls).await?;

        let shares = decode_result::<ICreditVault::balanceOfCall>(&r, 0);
        let max_withdraw = decode_result::<ICreditVault::maxWithdrawCall>(&r, 1);
        let native_balance = decode_result::<IMulticall3::getEthBalanceCall>(&r, 2);

        let assets = match shares {
            Some(s) if !s.is_zero() => {
                let vault = ICreditVault::new(self.vault, &self.provider);
                match vault.convertToAssets(s).call().await {
                    Ok(assets) => Some(assets),
                    Err(err) => {
                        warn!(%account, %err, "convertToAssets failed");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(UserPosition {
            account,
            native_balance,
            shares,
            assets,
            max_withdraw,
        })
    }

    async fn submit_write(&self, write: VaultWrite) -> Result<TxHandle> {
        let from = self.account.ok_or(VaultClientError::WalletNotConnected)?;
        let vault = ICreditVault::new(self.vault, &self.provider);

        let pending = match write {
            VaultWrite::Deposit { amount, receiver } => {
                vault.depositCTC(receiver).value(amount).from(from).send().await?
            }
            VaultWrite::Withdraw {
                amount,
                receiver,
                owner,
            } => vault.withdrawCTC(amount, receiver, owner).from(from).send().await?,
            VaultWrite::Redeem {
                shares,
                receiver,
                owner,
            } => vault.redeemCTC(shares, receiver, owner).from(from).send().await?,
        };

        let hash = *pending.tx_hash();
        info!(kind = ?write.kind(), tx = %hash, "vault write broadcast");
        Ok(TxHandle(hash))
    }

    async fn wait_for_receipt(&self, handle: TxHandle) -> Result<TxReceiptSummary> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), handle.hash())
            .get_receipt()
            .await?;

        if !receipt.status() {
            return Err(VaultClientError::Reverted {
                tx_hash: receipt.transaction_hash,
                reason: "execution reverted".to_string(),
            });
        }

        Ok(TxReceiptSummary {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    async fn latest_block(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn fetch_logs(&self, kind: EventKind, range: BlockRange) -> Result<Vec<RawVaultLog>> {
        let filter = Filter::new()
            .address(self.vault)
            .event_signature(event_signature(kind))
            .from_block(range.from)
            .to_block(range.to);

        let logs = self.provider.get_logs(&filter).await?;
        debug!(event = kind.event_name(), from = range.from, to = range.to, count = logs.len(), "fetched logs");

        #[cfg(feature = "verbose")]
        tracing::trace!(?logs, "raw logs");

        Ok(logs.iter().map(|log| decode_raw_log(kind, log)).collect())
    }
}
