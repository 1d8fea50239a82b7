//! Gas threshold and gate decision types.

use std::fmt;

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use thiserror::Error;

use crate::blockchain::{BlockchainError, GasPrice};
use crate::deploy::{DeployError, DeployOutcome};

const GWEI_DECIMALS: i64 = 9;

/// Gas price limit. Held as an exact wei amount so fractional gwei input
/// (`"19.5"`) compares without rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasThreshold {
    wei: U256,
}

/// Why a gas limit string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("invalid gas limit '{input}': {reason}")]
    Invalid { input: String, reason: String },

    #[error("gas limit must be a positive number of gwei, got '{0}'")]
    NonPositive(String),
}

impl GasThreshold {
    /// Parse a gwei amount such as `"20"`, `"19.5"` or `"2e1"`.
    ///
    /// The result must be a whole number of wei: input with more precision
    /// than 9 decimal places is rejected rather than rounded.
    pub fn parse(input: &str) -> Result<Self, ThresholdError> {
        let invalid = |reason: &str| ThresholdError::Invalid {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
            Some((mantissa, exponent)) => (
                mantissa,
                exponent
                    .parse::<i32>()
                    .map_err(|_| invalid("malformed exponent"))?,
            ),
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let well_formed = !(int_part.is_empty() && frac_part.is_empty())
            && int_part
                .bytes()
                .chain(frac_part.bytes())
                .all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(invalid("not a number"));
        }

        let joined = format!("{int_part}{frac_part}");
        let mut digits = joined.trim_start_matches('0');
        if digits.is_empty() || negative {
            return Err(ThresholdError::NonPositive(input.to_string()));
        }

        // wei = digits * 10^scale
        let mut scale = GWEI_DECIMALS + i64::from(exponent) - frac_part.len() as i64;
        while scale < 0 {
            match digits.strip_suffix('0') {
                Some(rest) => {
                    digits = rest;
                    scale += 1;
                }
                None => return Err(invalid("more than 9 decimal places")),
            }
        }

        let out_of_range = || invalid("out of range");
        let mantissa: U256 = digits.parse().map_err(|_| out_of_range())?;
        let factor = U256::from(10u8)
            .checked_pow(U256::from(scale as u64))
            .ok_or_else(out_of_range)?;
        let wei = mantissa.checked_mul(factor).ok_or_else(out_of_range)?;

        Ok(Self { wei })
    }

    pub fn from_gwei(gwei: u64) -> Self {
        Self {
            wei: U256::from(gwei) * U256::from(1_000_000_000u64),
        }
    }

    pub fn wei(&self) -> U256 {
        self.wei
    }

    /// True when `price` is strictly below the limit.
    pub fn admits(&self, price: GasPrice) -> bool {
        U256::from(price.wei()) < self.wei
    }
}

impl fmt::Display for GasThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_units(self.wei, "gwei") {
            Ok(gwei) => write!(f, "{gwei} gwei"),
            Err(_) => write!(f, "{} wei", self.wei),
        }
    }
}

/// What one `check_gas` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Price at or above the limit; still watching.
    Waiting { price: GasPrice },

    /// This call won the trigger and ran the deploy command.
    Deployed {
        price: GasPrice,
        outcome: DeployOutcome,
    },

    /// The gate had already left the watching state; nothing was done.
    Ignored,
}

/// Errors surfaced by the gate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Provider(#[from] BlockchainError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}
