//! Address format checks for EVM and Solana endpoints.

use crate::chains::ChainFamily;

/// Sentinel left in tables for values that still need to be filled in.
pub const TODO_SENTINEL: &str = "TODO";

/// Validates an address for a chain family.
///
/// - EVM: `0x`-prefixed hex, 20 bytes.
/// - Solana: base58, decoding to 32 bytes.
///
/// # Returns
///
/// - `Ok(())` - Address format is valid for the family
/// - `Err(anyhow::Error)` - Address format is invalid
pub fn validate_address(family: ChainFamily, address: &str) -> anyhow::Result<()> {
    match family {
        ChainFamily::Evm => {
            let stripped = address
                .strip_prefix("0x")
                .ok_or_else(|| anyhow::anyhow!("EVM address must be 0x-prefixed hex string"))?;
            let bytes = hex::decode(stripped).map_err(|_| anyhow::anyhow!("Invalid hex EVM address"))?;
            if bytes.len() != 20 {
                anyhow::bail!("Invalid EVM address length: expected 20 bytes, got {}", bytes.len());
            }
        }
        ChainFamily::Solana => {
            if address.starts_with("0x") {
                anyhow::bail!("Solana addresses must be base58 (got 0x-prefixed value)");
            }
            let bytes = bs58::decode(address)
                .into_vec()
                .map_err(|_| anyhow::anyhow!("Invalid base58 Solana address"))?;
            if bytes.len() != 32 {
                anyhow::bail!("Invalid Solana address length: expected 32 bytes, got {}", bytes.len());
            }
        }
    }
    Ok(())
}

/// True when `address` cannot stand for a real account: empty, the `TODO`
/// sentinel, or an all-zero address in either encoding.
pub fn is_placeholder_address(address: &str) -> bool {
    let trimmed = address.trim();
    if trimmed.is_empty() || trimmed == TODO_SENTINEL {
        return true;
    }

    if let Some(hex_digits) = trimmed.strip_prefix("0x") {
        return !hex_digits.is_empty() && hex_digits.chars().all(|c| c == '0');
    }

    // base58 '1' is the zero digit; an all-zero 32-byte key is 32 of them
    matches!(bs58::decode(trimmed).into_vec(), Ok(bytes) if !bytes.is_empty() && bytes.iter().all(|b| *b == 0))
}
