use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::amount::StakeAmount;
use crate::consts::{AssetDescriptor, Network, NetworkConfig, NetworkInfo, SwapMethod};
use crate::eth_client::{ChainError, ChainOps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Swap,
    Deposit,
    Both,
}

#[derive(Debug, Error)]
#[error("Unknown action {0:?}, expected swap, deposit or both")]
pub struct ActionParseError(String);

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "swap" => Ok(Self::Swap),
            "deposit" => Ok(Self::Deposit),
            "both" => Ok(Self::Both),
            other => Err(ActionParseError(other.to_owned())),
        }
    }
}

/// Terminal state of one workflow invocation.
///
/// Everything except `Completed` is a recovered no-op: no transaction was
/// submitted for the step that produced it, and the process exits cleanly
/// after reporting it. Hard failures (reverts, RPC errors) surface as
/// [`ChainError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    UnknownAsset { symbol: String },
    SwapUnsupported { symbol: String },
    DepositUnsupported { symbol: String },
    InsufficientBalance { held: StakeAmount, requested: StakeAmount },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::UnknownAsset { symbol } => write!(f, "unknown asset {symbol}"),
            Self::SwapUnsupported { symbol } => write!(f, "no swap path for {symbol}"),
            Self::DepositUnsupported { symbol } => write!(f, "no deposit strategy for {symbol}"),
            Self::InsufficientBalance { held, requested } => {
                write!(f, "insufficient balance: have {held}, want {requested}")
            }
        }
    }
}

/// Convert `amount` of native ether into `asset`.
///
/// One or two on-chain interactions: the acquiring transaction (confirmed
/// before returning) and a follow-up balance read for observability. Assets
/// without a swap path are a reported no-op so multi-step runs can continue
/// past them.
pub async fn swap<C: ChainOps>(
    ops: &C,
    config: &NetworkConfig,
    asset: &AssetDescriptor,
    amount: StakeAmount,
) -> Result<Outcome, ChainError> {
    let tx_hash = match asset.swap {
        SwapMethod::DirectTransfer => {
            tracing::info!(asset = asset.symbol, %amount, "Swapping ether via direct transfer to the token contract");
            ops.native_transfer(asset.token, amount.wei()).await?
        }
        SwapMethod::PoolDeposit { pool } => {
            tracing::info!(asset = asset.symbol, %amount, "Swapping ether via stake pool deposit");
            ops.pool_deposit(pool, ops.caller(), amount.wei()).await?
        }
        SwapMethod::Unsupported => {
            tracing::warn!(asset = asset.symbol, "No swap path for this asset, skipping");
            return Ok(Outcome::SwapUnsupported {
                symbol: asset.symbol.to_owned(),
            });
        }
    };
    tracing::info!("Swapped {} ether for {}. See tx details: {}", amount, asset.symbol, config.tx_url(tx_hash));

    // Check how much of the staked token the swap gave back
    let balance = ops.token_balance(asset.token, ops.caller()).await?;
    tracing::info!(asset = asset.symbol, "Current {} balance: {}", asset.symbol, StakeAmount::from_wei(balance));

    Ok(Outcome::Completed)
}

/// Deposit `amount` of an already-held `asset` into its EigenLayer strategy.
///
/// Balance and allowance are read fresh on every invocation and checked
/// before anything is submitted, so a known-failing deposit costs no gas.
/// The approval, when needed, is for exactly the requested amount. A standing
/// approval left behind by a deposit that later fails is not rolled back.
pub async fn deposit<C: ChainOps>(
    ops: &C,
    config: &NetworkConfig,
    asset: &AssetDescriptor,
    amount: StakeAmount,
) -> Result<Outcome, ChainError> {
    let Some(strategy) = asset.strategy else {
        tracing::warn!(asset = asset.symbol, "No strategy deployed for this asset on this network, skipping");
        return Ok(Outcome::DepositUnsupported {
            symbol: asset.symbol.to_owned(),
        });
    };

    let caller = ops.caller();
    let requested = amount.wei();

    // First, check the balance covers the deposit
    let held = ops.token_balance(asset.token, caller).await?;
    if requested > held {
        let held = StakeAmount::from_wei(held);
        tracing::warn!(asset = asset.symbol, "Insufficient balance: have {held}, want {amount}");
        return Ok(Outcome::InsufficientBalance { held, requested: amount });
    }

    // Next, check the allowance and approve if necessary
    let allowance = ops.token_allowance(asset.token, caller, config.strategy_manager).await?;
    if allowance < requested {
        tracing::info!(asset = asset.symbol, %allowance, "Insufficient allowance, approving {amount}");
        let approve_tx = ops.approve(asset.token, config.strategy_manager, requested).await?;
        tracing::info!(
            "Approved {} {} for the strategy manager. See tx details: {}",
            amount,
            asset.symbol,
            config.tx_url(approve_tx)
        );
    }

    // Finally, deposit
    let deposit_tx = ops
        .deposit_into_strategy(config.strategy_manager, strategy, asset.token, requested)
        .await?;
    tracing::info!(
        "Deposited {} {} into its strategy. See tx details: {}",
        amount,
        asset.symbol,
        config.tx_url(deposit_tx)
    );

    Ok(Outcome::Completed)
}

/// Run one workflow invocation: resolve the asset, then sequence the
/// requested steps strictly one after another, each transaction confirmed
/// before the next is built.
///
/// Stateless across invocations - every run re-reads on-chain state.
pub async fn run<C: ChainOps>(
    ops: &C,
    network: &Network,
    action: Action,
    symbol: &str,
    amount: StakeAmount,
) -> Result<Outcome, ChainError> {
    let config = network.get_config();

    let Some(asset) = config.asset(symbol) else {
        tracing::warn!(network = network.as_str(), "Asset {symbol} is not mapped on this network, nothing to do");
        return Ok(Outcome::UnknownAsset {
            symbol: symbol.to_owned(),
        });
    };

    tracing::info!(
        network = network.as_str(),
        asset = asset.symbol,
        ?action,
        %amount,
        "Starting workflow"
    );

    match action {
        Action::Swap => swap(ops, &config, asset, amount).await,
        Action::Deposit => deposit(ops, &config, asset, amount).await,
        Action::Both => {
            // Swap runs to completion (confirmations included) before the
            // deposit starts; the deposit re-checks the balance itself, so a
            // swap that minted less than requested fails there, cleanly.
            let swap_outcome = swap(ops, &config, asset, amount).await?;
            if swap_outcome != Outcome::Completed {
                tracing::warn!(asset = asset.symbol, "Swap step was a no-op ({swap_outcome}), attempting deposit anyway");
            }
            deposit(ops, &config, asset, amount).await
        }
    }
}
