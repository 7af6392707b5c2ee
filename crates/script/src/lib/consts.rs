use std::str::FromStr;

use alloy_primitives::{Address, TxHash};
use thiserror::Error;

/// How a given staked-asset variant is acquired from native ether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMethod {
    /// Plain ether transfer to the token contract mints the token
    /// (Lido-style `receive` hook).
    DirectTransfer,
    /// Payable `deposit(receiver)` call on a staking pool contract
    /// (Stader-style).
    PoolDeposit { pool: Address },
    /// No swap path wired up for this asset.
    Unsupported,
}

/// Static per-network entry for one staked-asset variant.
///
/// `strategy` is the EigenLayer strategy accepting this token; assets without
/// a deployed strategy on the network carry `None` and cannot be deposited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub symbol: &'static str,
    pub token: Address,
    pub strategy: Option<Address>,
    pub swap: SwapMethod,
}

pub struct NetworkConfig {
    pub chain_id: u64,
    /// EigenLayer StrategyManager - the spender approvals are granted to and
    /// the contract `depositIntoStrategy` is called on.
    pub strategy_manager: Address,
    pub assets: &'static [AssetDescriptor],
    pub explorer: &'static str,
}

impl NetworkConfig {
    /// Pure lookup; `None` means the asset has no mapping on this network.
    pub fn asset(&self, symbol: &str) -> Option<&'static AssetDescriptor> {
        self.assets.iter().find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn tx_url(&self, tx_hash: TxHash) -> String {
        format!("{}/tx/{tx_hash}", self.explorer)
    }
}

pub trait NetworkInfo {
    fn as_str(&self) -> String;
    fn get_config(&self) -> NetworkConfig;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Goerli,
    Mainnet,
}

impl NetworkInfo for Network {
    fn as_str(&self) -> String {
        let val = match self {
            Self::Goerli => "goerli",
            Self::Mainnet => "mainnet",
        };
        val.to_owned()
    }

    fn get_config(&self) -> NetworkConfig {
        match self {
            Self::Goerli => NetworkConfig {
                chain_id: 5,
                strategy_manager: eigenlayer::GOERLI_STRATEGY_MANAGER,
                assets: assets::GOERLI,
                explorer: "https://goerli.etherscan.io",
            },
            Self::Mainnet => NetworkConfig {
                chain_id: 1,
                strategy_manager: eigenlayer::MAINNET_STRATEGY_MANAGER,
                assets: assets::MAINNET,
                explorer: "https://etherscan.io",
            },
        }
    }
}

impl Network {
    pub fn rpc_endpoint(&self, infura_api_key: &str) -> String {
        format!("https://{}.infura.io/v3/{infura_api_key}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown network {0:?}, expected goerli or mainnet")]
pub struct NetworkParseError(String);

impl FromStr for Network {
    type Err = NetworkParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "goerli" => Ok(Self::Goerli),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(NetworkParseError(other.to_owned())),
        }
    }
}

pub mod eigenlayer {
    use alloy_primitives::{address, Address};

    // https://github.com/Layr-Labs/eigenlayer-contracts?tab=readme-ov-file#deployments
    pub const GOERLI_STRATEGY_MANAGER: Address = address!("0x779d1b5315df083e3F9E94cB495983500bA8E907");
    pub const MAINNET_STRATEGY_MANAGER: Address = address!("0x858646372CC42E1A627fcE94aa7A7033e7CF075A");
}

pub mod assets {
    use super::{AssetDescriptor, SwapMethod};
    use alloy_primitives::address;

    // Obtaining stETH on Goerli is a plain send of goETH to the token
    // contract; ETHx goes through the Stader stake pool manager. rETH has no
    // swap path (would need a DEX) and ETHx has no Goerli strategy.
    pub const GOERLI: &[AssetDescriptor] = &[
        AssetDescriptor {
            symbol: "stETH",
            token: address!("0x1643E812aE58766192Cf7D2Cf9567dF2C37e9B7F"),
            strategy: Some(address!("0xB613E78E2068d7489bb66419fB1cfa11275d14da")),
            swap: SwapMethod::DirectTransfer,
        },
        AssetDescriptor {
            symbol: "rETH",
            token: address!("0x178E141a0E3b34152f73Ff610437A7bf9B83267A"),
            strategy: Some(address!("0x879944A8cB437a5f8061361f82A6d4EED59070b5")),
            swap: SwapMethod::Unsupported,
        },
        AssetDescriptor {
            symbol: "ETHx",
            token: address!("0x3338eCd3ab3d3503c55c931d759fA6d78d287236"),
            strategy: None,
            swap: SwapMethod::PoolDeposit {
                pool: address!("0xd0e400Ec6Ed9C803A9D9D3a602494393E806F823"),
            },
        },
    ];

    pub const MAINNET: &[AssetDescriptor] = &[
        AssetDescriptor {
            symbol: "stETH",
            token: address!("0xae7ab96520DE3A18E5e111B5EaAb095312D7fE84"),
            strategy: Some(address!("0x93c4b944D05dfe6df7645A86cd2206016c51564D")),
            swap: SwapMethod::DirectTransfer,
        },
        AssetDescriptor {
            symbol: "rETH",
            token: address!("0xae78736Cd615f374D3085123A210448E74Fc6393"),
            strategy: Some(address!("0x1BeE69b7dFFfA4E2d53C2a2Df135C388AD25dCD2")),
            swap: SwapMethod::Unsupported,
        },
        AssetDescriptor {
            symbol: "cbETH",
            token: address!("0xBe9895146f7AF43049ca1c1AE358B0541Ea49704"),
            strategy: Some(address!("0x54945180dB7943c0ed0FEE7EdaB2Bd24620256bc")),
            swap: SwapMethod::Unsupported,
        },
        AssetDescriptor {
            symbol: "ETHx",
            token: address!("0xA35b1B31Ce002FBF2058D22F30f95D405200A15b"),
            strategy: Some(address!("0x9d7eD45EE2E8FC5482fa2428f15C971e6369011d")),
            swap: SwapMethod::PoolDeposit {
                pool: address!("0xcf5EA1b38380f6aF39068375516Daf40Ed70D299"),
            },
        },
        AssetDescriptor {
            symbol: "ankrETH",
            token: address!("0xE95A203B1a91a908F9B9CE46459d101078c2c3cb"),
            strategy: Some(address!("0x13760F50a9d7377e4F20CB8CF9e4c26586c658ff")),
            swap: SwapMethod::Unsupported,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let config = Network::Goerli.get_config();
        let asset = config.asset("steth").expect("stETH should exist on goerli");
        assert_eq!(asset.symbol, "stETH");
        assert_eq!(asset.swap, SwapMethod::DirectTransfer);
    }

    #[test]
    fn unknown_symbol_is_none() {
        let config = Network::Goerli.get_config();
        assert!(config.asset("cbETH").is_none());
        assert!(config.asset("DOGE").is_none());
    }

    #[test]
    fn goerli_ethx_has_no_strategy() {
        let config = Network::Goerli.get_config();
        let asset = config.asset("ETHx").unwrap();
        assert!(asset.strategy.is_none());
        assert!(matches!(asset.swap, SwapMethod::PoolDeposit { .. }));
    }

    #[test]
    fn mainnet_covers_all_five_assets() {
        let config = Network::Mainnet.get_config();
        for symbol in ["stETH", "rETH", "cbETH", "ETHx", "ankrETH"] {
            let asset = config.asset(symbol).unwrap_or_else(|| panic!("{symbol} missing on mainnet"));
            assert!(asset.strategy.is_some());
        }
        assert_eq!(config.asset("cbETH").unwrap().swap, SwapMethod::Unsupported);
    }

    #[test]
    fn strategy_managers_differ_per_network() {
        let goerli = Network::Goerli.get_config();
        let mainnet = Network::Mainnet.get_config();
        assert_ne!(goerli.strategy_manager, mainnet.strategy_manager);
    }

    #[test]
    fn network_parsing() {
        assert_eq!("goerli".parse::<Network>().unwrap(), Network::Goerli);
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("sepolia".parse::<Network>().is_err());
    }
}
