use std::fmt;
use std::str::FromStr;

use alloy_primitives::utils::{format_ether, parse_ether, UnitsError};
use alloy_primitives::U256;
use thiserror::Error;

/// A token or ether quantity in 18-decimal base units (wei).
///
/// Constructed from a decimal string; conversion must be exact - quantities
/// are compared as base-unit integers only, never as floats, so an amount
/// with more than 18 fractional digits is rejected rather than rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StakeAmount(U256);

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Failed to parse amount: {0}")]
    Parse(#[from] UnitsError),

    #[error("Amount must be greater than zero")]
    Zero,
}

impl StakeAmount {
    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub fn wei(&self) -> U256 {
        self.0
    }
}

impl FromStr for StakeAmount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wei = parse_ether(value.trim())?;
        if wei.is_zero() {
            return Err(AmountError::Zero);
        }
        Ok(Self(wei))
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_ether(self.0))
    }
}
