//! L2 address derivation and L1 to L2 sender aliasing.

use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use serde::{Deserialize, Serialize};

use crate::{BytecodeHash, CREATE2_PREFIX, InputError, L1_TO_L2_ALIAS_OFFSET};

/// Kind of account that originates an L1 to L2 transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SenderKind {
    /// A contract. Its address is aliased on L2.
    Contract,
    /// An externally-owned account. Its address is used as is.
    ExternallyOwned,
}

/// Everything that determines the address of an L2 `CREATE2` deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Address of the deployer as seen on L2 (already aliased if needed).
    pub deployer: Address,
    /// Hash of the deployed bytecode.
    pub bytecode_hash: BytecodeHash,
    /// ABI-encoded constructor arguments.
    pub constructor_input: Bytes,
    /// `CREATE2` salt.
    pub salt: B256,
}

impl DeploymentSpec {
    /// Creates a deployment with empty constructor input and a zero salt.
    pub fn new(deployer: Address, bytecode_hash: BytecodeHash) -> Self {
        Self { deployer, bytecode_hash, constructor_input: Bytes::new(), salt: B256::ZERO }
    }

    /// Sets the constructor input.
    pub fn with_constructor_input(mut self, input: impl Into<Bytes>) -> Self {
        self.constructor_input = input.into();
        self
    }

    /// Sets the salt.
    pub const fn with_salt(mut self, salt: B256) -> Self {
        self.salt = salt;
        self
    }

    /// Returns the L2 address this deployment creates.
    pub fn address(&self) -> Address {
        derive_create2_address(self)
    }
}

/// Derives the address of an L2 `CREATE2` deployment.
///
/// `keccak256(CREATE2_PREFIX || pad32(deployer) || salt || bytecodeHash || keccak256(input))[12..]`
pub fn derive_create2_address(spec: &DeploymentSpec) -> Address {
    let mut preimage = Vec::with_capacity(5 * 32);
    preimage.extend_from_slice(CREATE2_PREFIX.as_slice());
    preimage.extend_from_slice(spec.deployer.into_word().as_slice());
    preimage.extend_from_slice(spec.salt.as_slice());
    preimage.extend_from_slice(spec.bytecode_hash.as_slice());
    preimage.extend_from_slice(keccak256(&spec.constructor_input).as_slice());
    Address::from_word(keccak256(preimage))
}

/// Returns the L2 sender address of an L1 account.
///
/// Contracts are shifted by [`L1_TO_L2_ALIAS_OFFSET`] modulo 2^160. Externally-owned
/// accounts keep their address.
pub fn apply_l1_to_l2_alias(l1_address: Address, sender: SenderKind) -> Address {
    match sender {
        SenderKind::Contract => {
            from_u256(to_u256(l1_address).wrapping_add(to_u256(L1_TO_L2_ALIAS_OFFSET)))
        }
        SenderKind::ExternallyOwned => l1_address,
    }
}

/// Recovers the L1 contract address behind an aliased L2 sender.
pub fn undo_l1_to_l2_alias(l2_address: Address) -> Address {
    from_u256(to_u256(l2_address).wrapping_sub(to_u256(L1_TO_L2_ALIAS_OFFSET)))
}

/// Parses a 20-byte address.
pub fn address_from_slice(bytes: &[u8]) -> Result<Address, InputError> {
    if bytes.len() != 20 {
        return Err(InputError::InvalidAddress { len: bytes.len() });
    }
    Ok(Address::from_slice(bytes))
}

/// Parses a 32-byte hash.
pub fn b256_from_slice(bytes: &[u8]) -> Result<B256, InputError> {
    if bytes.len() != 32 {
        return Err(InputError::InvalidHash { len: bytes.len() });
    }
    Ok(B256::from_slice(bytes))
}

fn to_u256(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

// Keeping the low 20 bytes reduces the value modulo 2^160.
fn from_u256(value: U256) -> Address {
    Address::from_word(B256::from(value.to_be_bytes::<32>()))
}
