//! EIP-712 domain separator for the OPINION CTF Exchange.
//!
//! The exchange validates order signatures against a domain separator
//! binding each signature to a specific contract, chain, and protocol
//! version. The domain name and version are fixed by the deployed
//! contracts; deviating from them by a single character invalidates every
//! signature.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// Chain ID for BNB Chain (BSC) mainnet.
pub const BNB_CHAIN_ID: u64 = 56;

/// Conditional tokens contract address on BNB mainnet.
pub const CONDITIONAL_TOKENS_ADDRESS: &str = "0xAD1a38cEc043e70E83a3eC30443dB285ED10D774";

/// EIP-712 domain name fixed by the exchange contracts.
pub const EIP712_DOMAIN_NAME: &str = "OPINION CTF Exchange";

/// EIP-712 domain version fixed by the exchange contracts.
pub const EIP712_DOMAIN_VERSION: &str = "1";

/// EIP-712 domain separator data for order signing.
#[derive(Debug, Clone)]
pub struct Eip712Domain {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain ID.
    pub chain_id: U256,
    /// Verifying contract address.
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// Create a domain for an exchange contract on the given chain, using
    /// the standard name and version.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: EIP712_DOMAIN_NAME.to_string(),
            version: EIP712_DOMAIN_VERSION.to_string(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Create a domain with fully custom parameters.
    pub fn custom(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    ///
    /// Every field occupies a 32-byte slot per standard ABI static
    /// encoding; the verifying contract is left-padded from 20 bytes.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(
            b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
        );

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (
            domain_type_hash,
            name_hash,
            version_hash,
            self.chain_id,
            contract_padded,
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Order side (buy/sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSide {
    #[default]
    Buy = 0,
    Sell = 1,
}

impl OrderSide {
    /// Get the numeric code used on the wire and in signing.
    pub fn as_u8(&self) -> u8 {
        match self {
            OrderSide::Buy => 0,
            OrderSide::Sell => 1,
        }
    }

    /// Parse the numeric code back into a side.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(OrderSide::Buy),
            1 => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Signature type for orders.
///
/// Determines how the exchange contract validates the signature; the
/// signing core produces the same raw ECDSA signature regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureType {
    /// EOA signature (most common).
    #[default]
    Eoa = 0,
    /// Gnosis Safe multisig signature.
    GnosisSafe = 1,
    /// Proxy wallet signature.
    Proxy = 2,
}

impl SignatureType {
    /// Get the numeric code used on the wire and in signing.
    pub fn as_u8(&self) -> u8 {
        match self {
            SignatureType::Eoa => 0,
            SignatureType::GnosisSafe => 1,
            SignatureType::Proxy => 2,
        }
    }

    /// Parse the numeric code back into a signature type.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(SignatureType::Eoa),
            1 => Some(SignatureType::GnosisSafe),
            2 => Some(SignatureType::Proxy),
            _ => None,
        }
    }
}
