//! Structured order hashing (EIP-712).
//!
//! ```text
//! domainSeparator = keccak256(DOMAIN_TYPEHASH ‖ keccak256(name) ‖ keccak256(version)
//!                             ‖ chainId ‖ verifyingContract)
//! structHash      = keccak256(ORDER_TYPEHASH ‖ maker ‖ sourceToken ‖ destinationToken
//!                             ‖ amountIn ‖ minAmountOut ‖ recipient ‖ deadline)
//! orderHash       = keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)
//! ```
//!
//! Every field is ABI-encoded as a 32-byte word. Binding the chain id and
//! the registry address into the separator keeps a signature from being
//! replayed on another deployment or chain. All functions here are pure.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::types::Order;

/// EIP-712 domain type string
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Order type string
pub const ORDER_TYPE: &str = "Order(address maker,address sourceToken,address destinationToken,uint256 amountIn,uint256 minAmountOut,address recipient,uint256 deadline)";

/// Cancellation type string
pub const CANCEL_TYPE: &str = "CancelOrder(bytes32 orderHash)";

/// Default domain name
pub const DEFAULT_NAME: &str = "OrderBook";

/// Default domain version
pub const DEFAULT_VERSION: &str = "1";

/// Signing domain of one registry deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
    separator: B256,
}

impl Domain {
    /// Create a domain and compute its separator
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let separator = domain_separator(&name, &version, chain_id, verifying_contract);
        Self {
            name,
            version,
            chain_id,
            verifying_contract,
            separator,
        }
    }

    /// Default name and version for `chain_id` and `verifying_contract`
    pub fn with_defaults(chain_id: u64, verifying_contract: Address) -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_VERSION, chain_id, verifying_contract)
    }

    #[inline]
    pub fn separator(&self) -> B256 {
        self.separator
    }

    /// The order hash: signing digest and primary key of `order`
    pub fn hash_order(&self, order: &Order) -> B256 {
        typed_data_hash(self.separator, order_struct_hash(order))
    }

    /// Digest a maker signs to cancel `order_hash`
    pub fn cancel_digest(&self, order_hash: &B256) -> B256 {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(keccak256(CANCEL_TYPE).as_slice());
        buf.extend_from_slice(order_hash.as_slice());
        typed_data_hash(self.separator, keccak256(buf))
    }
}

/// Compute an EIP-712 domain separator
pub fn domain_separator(
    name: &str,
    version: &str,
    chain_id: u64,
    verifying_contract: Address,
) -> B256 {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(keccak256(name.as_bytes()).as_slice());
    buf.extend_from_slice(keccak256(version.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(verifying_contract.into_word().as_slice());
    keccak256(buf)
}

/// Hash of the ABI-encoded order fields
pub fn order_struct_hash(order: &Order) -> B256 {
    let mut buf = Vec::with_capacity(32 * 8);
    buf.extend_from_slice(keccak256(ORDER_TYPE).as_slice());
    buf.extend_from_slice(order.maker.into_word().as_slice());
    buf.extend_from_slice(order.source_token.into_word().as_slice());
    buf.extend_from_slice(order.destination_token.into_word().as_slice());
    buf.extend_from_slice(&order.amount_in.to_be_bytes::<32>());
    buf.extend_from_slice(&order.min_amount_out.to_be_bytes::<32>());
    buf.extend_from_slice(order.recipient.into_word().as_slice());
    buf.extend_from_slice(&U256::from(order.deadline).to_be_bytes::<32>());
    keccak256(buf)
}

/// `keccak256(0x1901 ‖ separator ‖ struct_hash)`
pub fn typed_data_hash(separator: B256, struct_hash: B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(separator.as_slice());
    buf[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}
