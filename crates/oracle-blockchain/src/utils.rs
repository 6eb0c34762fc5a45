use alloy::primitives::Address;

use crate::BlockchainError;

/// Parses a hex address as stored on-chain or in configuration.
///
/// Accepts any casing; the registry stores whatever the submitter typed.
pub fn normalize_address(value: &str) -> Result<Address, BlockchainError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| BlockchainError::InvalidAddress {
            address: value.to_string(),
        })
}

/// EIP-55 checksummed representation.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}
