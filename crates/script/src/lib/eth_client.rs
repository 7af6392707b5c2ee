use std::sync::Arc;
use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::providers::fillers::RecommendedFillers;
use alloy::providers::{PendingTransactionBuilder, PendingTransactionError, Provider, ProviderBuilder, WatchTxError};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use alloy_primitives::{Address, TxHash, U256};
use thiserror::Error;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    interface IStrategyManager {
        function depositIntoStrategy(address strategy, address token, uint256 amount) external returns (uint256 shares);
    }
}

sol! {
    #[sol(rpc)]
    interface IStakePoolManager {
        function deposit(address receiver) external payable returns (uint256 shares);
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Call rejected by contract: {0}")]
    Rejection(String),

    #[error("Contract call failed: {0:#?}")]
    Contract(alloy::contract::Error),

    #[error("RPC error: {0:#?}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),

    // Mined with status 0. Never retried automatically - a fresh invocation
    // re-reads balance and allowance before submitting again.
    #[error("Transaction {tx_hash} reverted on-chain")]
    Reverted { tx_hash: TxHash },

    #[error("Timed out waiting for receipt of {tx_hash}; the transaction may still confirm later")]
    ReceiptTimeout { tx_hash: TxHash },

    #[error("Transaction watcher error: {0:#?}")]
    Watcher(PendingTransactionError),
}

impl From<alloy::contract::Error> for ChainError {
    fn from(error: alloy::contract::Error) -> Self {
        if let alloy::contract::Error::TransportError(alloy::transports::RpcError::ErrorResp(ref error_payload)) = error
        {
            if error_payload.message.contains("execution reverted") {
                ChainError::Rejection(error_payload.message.to_string())
            } else {
                ChainError::Contract(error)
            }
        } else {
            ChainError::Contract(error)
        }
    }
}

/// The chain capability the workflow runs against: ERC20 reads, confirmed
/// ERC20/strategy/pool writes, and native transfers, all issued from one
/// caller account.
///
/// Every state-changing method submits exactly one transaction and blocks
/// until its receipt confirms, so callers can sequence dependent steps
/// without racing their own nonces.
pub trait ChainOps {
    fn caller(&self) -> Address;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    async fn token_allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, ChainError>;

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash, ChainError>;

    async fn deposit_into_strategy(
        &self,
        manager: Address,
        strategy: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError>;

    async fn pool_deposit(&self, pool: Address, receiver: Address, value: U256) -> Result<TxHash, ChainError>;

    async fn native_transfer(&self, to: Address, value: U256) -> Result<TxHash, ChainError>;
}

pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(300);

/// Production [`ChainOps`] over an alloy provider with a wallet filler.
pub struct EthereumOps<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: Arc<P>,
    caller: Address,
    receipt_timeout: Duration,
}

impl<P> EthereumOps<P>
where
    P: Provider<Ethereum> + Clone,
{
    pub fn new(provider: Arc<P>, caller: Address, receipt_timeout: Duration) -> Self {
        Self {
            provider,
            caller,
            receipt_timeout,
        }
    }

    /// Wait for the receipt and require status 1.
    async fn confirm(&self, pending: PendingTransactionBuilder<Ethereum>) -> Result<TxHash, ChainError> {
        let tx_hash = *pending.tx_hash();
        tracing::debug!("Submitted transaction {tx_hash}, waiting for receipt");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|err| match err {
                PendingTransactionError::TxWatcher(WatchTxError::Timeout) => ChainError::ReceiptTimeout { tx_hash },
                other => ChainError::Watcher(other),
            })?;

        if !receipt.status() {
            tracing::error!("Transaction reverted {:#?}", receipt.transaction_hash);
            return Err(ChainError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        tracing::debug!("Transaction confirmed {:#?}", receipt.transaction_hash);
        Ok(receipt.transaction_hash)
    }
}

impl<P> ChainOps for EthereumOps<P>
where
    P: Provider<Ethereum> + Clone,
{
    fn caller(&self) -> Address {
        self.caller
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        let balance = IERC20::new(token, Arc::clone(&self.provider))
            .balanceOf(owner)
            .call()
            .await?;
        Ok(balance._0)
    }

    async fn token_allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, ChainError> {
        let allowance = IERC20::new(token, Arc::clone(&self.provider))
            .allowance(owner, spender)
            .call()
            .await?;
        Ok(allowance._0)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash, ChainError> {
        let pending = IERC20::new(token, Arc::clone(&self.provider))
            .approve(spender, amount)
            .from(self.caller)
            .send()
            .await?;
        self.confirm(pending).await
    }

    async fn deposit_into_strategy(
        &self,
        manager: Address,
        strategy: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError> {
        let contract = IStrategyManager::new(manager, Arc::clone(&self.provider));
        let tx_builder = contract.depositIntoStrategy(strategy, token, amount).from(self.caller);

        // Optional preflight call to surface revert reasons before sending a
        // tx. This mirrors what we send on-chain, so if it already reverts we
        // can fail fast without spending gas.
        if std::env::var("SKIP_PREFLIGHT_CALL").is_err() {
            if let Err(err) = tx_builder.call().await {
                tracing::error!("Preflight call for depositIntoStrategy reverted: {err:?}");
                return Err(err.into());
            }
        }

        let pending = tx_builder.send().await?;
        self.confirm(pending).await
    }

    async fn pool_deposit(&self, pool: Address, receiver: Address, value: U256) -> Result<TxHash, ChainError> {
        let pending = IStakePoolManager::new(pool, Arc::clone(&self.provider))
            .deposit(receiver)
            .from(self.caller)
            .value(value)
            .send()
            .await?;
        self.confirm(pending).await
    }

    async fn native_transfer(&self, to: Address, value: U256) -> Result<TxHash, ChainError> {
        let tx = TransactionRequest::default().with_to(to).with_value(value);
        let pending = self.provider.send_transaction(tx).await?;
        self.confirm(pending).await
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to parse private key")]
    ParsePrivateKey,
}

pub type DefaultProvider = alloy::providers::fillers::FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::fillers::JoinFill<
            alloy::providers::Identity,
            <Ethereum as RecommendedFillers>::RecommendedFillers,
        >,
        alloy::providers::fillers::WalletFiller<EthereumWallet>,
    >,
    alloy::providers::RootProvider,
>;

pub struct ProviderFactory {}

impl ProviderFactory {
    pub fn create_provider(signer: PrivateKeySigner, endpoint: Url) -> (DefaultProvider, Address) {
        let caller = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new().wallet(wallet).on_http(endpoint);
        (provider, caller)
    }

    pub fn create_provider_parse_key(key_str: &str, endpoint: Url) -> Result<(DefaultProvider, Address), ProviderError> {
        let signer: PrivateKeySigner = key_str.trim().parse().map_err(|_e| ProviderError::ParsePrivateKey)?;
        Ok(Self::create_provider(signer, endpoint))
    }
}
