use std::sync::Arc;
use std::time::Duration;

use alloy::transports::http::reqwest::Url;
use thiserror::Error;

use crate::consts::Network;
use crate::eth_client::{self, DefaultProvider, EthereumOps, ProviderFactory, DEFAULT_RECEIPT_TIMEOUT};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Required env var {0} is not set")]
    MissingEnvVar(&'static str),

    #[error("Failed to parse env var {name}: {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },

    #[error("Failed to parse RPC endpoint URL")]
    InvalidUrl,

    #[error(transparent)]
    InvalidKey(#[from] eth_client::ProviderError),
}

pub mod env_vars {
    use std::env;
    use std::fmt::Debug;

    use super::Error;

    #[derive(Clone)]
    pub struct EnvVarValue<TVal> {
        pub name: &'static str,
        pub sensitive: bool,
        pub value: TVal,
    }

    impl<TVal: Debug> Debug for EnvVarValue<TVal> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let value_print = if self.sensitive {
                "***".to_string()
            } else {
                format!("{:?}", self.value)
            };
            f.debug_struct("EnvVarValue")
                .field("name", &self.name)
                .field("value", &value_print)
                .finish()
        }
    }

    /// Startup configuration. Missing credentials are a fatal configuration
    /// error raised here, before any network call is made.
    #[derive(Debug, Clone)]
    pub struct EnvVars {
        pub infura_api_key: EnvVarValue<String>,
        pub private_key: EnvVarValue<String>,
        pub tx_timeout_secs: EnvVarValue<Option<u64>>,
    }

    impl EnvVars {
        fn required(name: &'static str, sensitive: bool) -> Result<EnvVarValue<String>, Error> {
            let value = env::var(name).map_err(|_| Error::MissingEnvVar(name))?;
            Ok(EnvVarValue { name, sensitive, value })
        }

        fn optional_u64(name: &'static str) -> Result<EnvVarValue<Option<u64>>, Error> {
            let value = match env::var(name) {
                Ok(raw) => Some(raw.parse().map_err(|_| Error::InvalidEnvVar { name, value: raw })?),
                Err(_) => None,
            };
            Ok(EnvVarValue {
                name,
                sensitive: false,
                value,
            })
        }

        pub fn init_from_env() -> Result<Self, Error> {
            Ok(Self {
                infura_api_key: Self::required("INFURA_API_KEY", true)?,
                private_key: Self::required("PRIVATE_KEY", true)?,
                tx_timeout_secs: Self::optional_u64("TX_TIMEOUT_SECS")?,
            })
        }
    }
}

pub struct Runtime {
    pub network: Network,
    pub ops: EthereumOps<DefaultProvider>,
    pub provider: Arc<DefaultProvider>,
}

impl Runtime {
    pub fn init(network: Network, env: &env_vars::EnvVars) -> Result<Self, Error> {
        let endpoint: Url = network
            .rpc_endpoint(&env.infura_api_key.value)
            .parse()
            .map_err(|_| Error::InvalidUrl)?;

        let (provider, caller) = ProviderFactory::create_provider_parse_key(&env.private_key.value, endpoint)?;
        let provider = Arc::new(provider);

        let receipt_timeout = env
            .tx_timeout_secs
            .value
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RECEIPT_TIMEOUT);

        tracing::debug!(caller = %caller, ?receipt_timeout, "Initialized runtime for {:?}", env);
        let ops = EthereumOps::new(Arc::clone(&provider), caller, receipt_timeout);

        Ok(Self {
            network,
            ops,
            provider,
        })
    }

    pub fn init_from_env(network: Network) -> Result<Self, Error> {
        let env = env_vars::EnvVars::init_from_env()?;
        Self::init(network, &env)
    }
}
