//! Interactive fallback when no gas limit is given on the command line.

use std::io::{self, BufRead, Write};

use crate::deploy::NetworkMode;
use crate::gate::{GasThreshold, ThresholdError};

/// Gas limit used when the operator just presses enter.
pub const DEFAULT_GAS_LIMIT_GWEI: u64 = 20;

/// Failure while asking the operator for run settings.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("failed to read answer: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// Ask for the target network, then the gas limit.
///
/// An empty answer (or end of input) means testnet and the default limit.
pub fn ask_run_settings<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<(NetworkMode, GasThreshold), PromptError> {
    let mainnet = ask(&mut input, &mut output, "Deploy to mainnet? [y/N] ")?;
    let network = if matches!(mainnet.to_ascii_lowercase().as_str(), "y" | "yes") {
        NetworkMode::Mainnet
    } else {
        NetworkMode::Testnet
    };

    let limit = ask(
        &mut input,
        &mut output,
        &format!("Gas limit in gwei [{DEFAULT_GAS_LIMIT_GWEI}]: "),
    )?;
    let threshold = if limit.is_empty() {
        GasThreshold::from_gwei(DEFAULT_GAS_LIMIT_GWEI)
    } else {
        GasThreshold::parse(&limit)?
    };

    Ok((network, threshold))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    output.write_all(question.as_bytes())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(script: &str) -> (Result<(NetworkMode, GasThreshold), PromptError>, String) {
        let mut shown = Vec::new();
        let result = ask_run_settings(script.as_bytes(), &mut shown);
        (result, String::from_utf8(shown).unwrap())
    }

    #[test]
    fn test_defaults_on_empty_answers() {
        let (result, shown) = answer("\n\n");
        let (network, threshold) = result.unwrap();
        assert_eq!(network, NetworkMode::Testnet);
        assert_eq!(threshold, GasThreshold::from_gwei(20));
        assert_eq!(shown, "Deploy to mainnet? [y/N] Gas limit in gwei [20]: ");
    }

    #[test]
    fn test_defaults_on_closed_input() {
        let (result, _) = answer("");
        assert_eq!(
            result.unwrap(),
            (NetworkMode::Testnet, GasThreshold::from_gwei(20))
        );
    }

    #[test]
    fn test_mainnet_and_custom_limit() {
        let (result, _) = answer("Yes\n 35.5 \n");
        let (network, threshold) = result.unwrap();
        assert_eq!(network, NetworkMode::Mainnet);
        assert_eq!(threshold, GasThreshold::parse("35.5").unwrap());
    }

    #[test]
    fn test_invalid_limit() {
        let (result, _) = answer("y\nabc\n");
        assert!(matches!(result, Err(PromptError::Threshold(_))));
    }
}
