//! Bridge initialization: the L2 counterpart layout and the initialization state machine.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use serde::{Deserialize, Serialize};

use crate::{
    BytecodeHash, BytecodeHasher, BytecodeResult, DeploymentSpec, InitStateError, SenderKind,
    apply_l1_to_l2_alias,
    contracts::{IL1Bridge, IL2Bridge},
};

/// Progress of a bridge's initialization.
///
/// States only move forward, one step per landed transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeInitState {
    /// Nothing has been submitted.
    #[default]
    Unpublished,
    /// The token bytecodes are published on L2.
    BytecodesPublished,
    /// The L2 counterpart is deployed and initialized.
    Initialized,
    /// Governance has taken over the bridge.
    GovernanceConfigured,
}

impl BridgeInitState {
    /// Returns the state following `self`, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Unpublished => Some(Self::BytecodesPublished),
            Self::BytecodesPublished => Some(Self::Initialized),
            Self::Initialized => Some(Self::GovernanceConfigured),
            Self::GovernanceConfigured => None,
        }
    }

    /// Returns true once no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GovernanceConfigured)
    }

    /// Returns true once the bridge can process deposits.
    pub const fn is_operational(self) -> bool {
        matches!(self, Self::Initialized | Self::GovernanceConfigured)
    }

    /// Moves to `to`, which must be the direct successor of the current state.
    pub fn advance(&mut self, to: Self) -> Result<(), InitStateError> {
        if self.next() != Some(to) {
            return Err(InitStateError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

impl std::fmt::Display for BridgeInitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unpublished => "unpublished",
            Self::BytecodesPublished => "bytecodes-published",
            Self::Initialized => "initialized",
            Self::GovernanceConfigured => "governance-configured",
        };
        f.write_str(name)
    }
}

/// Bytecodes of the L2 contracts that make up a bridge counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeBytecodes {
    /// `L2ERC20Bridge` implementation.
    pub l2_bridge_implementation: Bytes,
    /// `TransparentUpgradeableProxy` in front of the L2 bridge.
    pub l2_bridge_proxy: Bytes,
    /// `BeaconProxy` deployed for every bridged token.
    pub l2_token_proxy: Bytes,
    /// `L2StandardERC20` implementation.
    pub l2_standard_token: Bytes,
    /// `UpgradeableBeacon` pointing at the standard token.
    pub l2_token_beacon: Bytes,
}

impl BridgeBytecodes {
    /// Hashes every bytecode.
    pub fn hashes(&self, hasher: &BytecodeHasher) -> BytecodeResult<BridgeContractHashes> {
        Ok(BridgeContractHashes {
            l2_bridge_implementation: hasher.hash(&self.l2_bridge_implementation)?,
            l2_bridge_proxy: hasher.hash(&self.l2_bridge_proxy)?,
            l2_token_proxy: hasher.hash(&self.l2_token_proxy)?,
            l2_standard_token: hasher.hash(&self.l2_standard_token)?,
            l2_token_beacon: hasher.hash(&self.l2_token_beacon)?,
        })
    }

    /// Bytecodes published by the first initialization transaction.
    pub fn publication_deps(&self) -> Vec<Bytes> {
        vec![self.l2_token_beacon.clone(), self.l2_standard_token.clone()]
    }

    /// Bytecodes passed to the L1 bridge's `initialize`.
    pub fn initialization_deps(&self) -> Vec<Bytes> {
        vec![
            self.l2_bridge_implementation.clone(),
            self.l2_bridge_proxy.clone(),
            self.l2_token_proxy.clone(),
        ]
    }
}

/// Bytecode hashes of the bridge counterpart contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeContractHashes {
    /// `L2ERC20Bridge` implementation.
    pub l2_bridge_implementation: BytecodeHash,
    /// `TransparentUpgradeableProxy`.
    pub l2_bridge_proxy: BytecodeHash,
    /// `BeaconProxy`.
    pub l2_token_proxy: BytecodeHash,
    /// `L2StandardERC20`.
    pub l2_standard_token: BytecodeHash,
    /// `UpgradeableBeacon`.
    pub l2_token_beacon: BytecodeHash,
}

/// L2 addresses of a bridge counterpart, known before anything is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeL2Addresses {
    /// `L2ERC20Bridge` implementation.
    pub bridge_implementation: Address,
    /// Proxy that is the bridge's public L2 address.
    pub bridge_proxy: Address,
    /// `L2StandardERC20` implementation.
    pub standard_token: Address,
    /// Beacon of the bridged token proxies.
    pub token_beacon: Address,
}

impl BridgeL2Addresses {
    /// Derives the counterpart addresses of the L1 bridge at `l1_bridge`.
    ///
    /// The implementation and proxy are deployed by the aliased L1 bridge; the token
    /// contracts are deployed by the L2 bridge proxy.
    pub fn compute(l1_bridge: Address, governor: Address, hashes: &BridgeContractHashes) -> Self {
        let deployer = apply_l1_to_l2_alias(l1_bridge, SenderKind::Contract);

        let bridge_implementation =
            DeploymentSpec::new(deployer, hashes.l2_bridge_implementation).address();
        let bridge_proxy = DeploymentSpec::new(deployer, hashes.l2_bridge_proxy)
            .with_constructor_input(bridge_proxy_constructor_input(
                bridge_implementation,
                governor,
                l2_bridge_initialize_calldata(l1_bridge, hashes.l2_token_proxy, governor),
            ))
            .address();
        let standard_token = DeploymentSpec::new(bridge_proxy, hashes.l2_standard_token).address();
        let token_beacon = DeploymentSpec::new(bridge_proxy, hashes.l2_token_beacon)
            .with_constructor_input(standard_token.abi_encode())
            .address();

        Self { bridge_implementation, bridge_proxy, standard_token, token_beacon }
    }
}

/// Encodes `L2ERC20Bridge.initialize`, run by the proxy constructor.
pub fn l2_bridge_initialize_calldata(
    l1_bridge: Address,
    token_proxy_hash: BytecodeHash,
    governor: Address,
) -> Bytes {
    IL2Bridge::initializeCall {
        _l1Bridge: l1_bridge,
        _l2TokenProxyBytecodeHash: token_proxy_hash.as_b256(),
        _governor: governor,
    }
    .abi_encode()
    .into()
}

/// Encodes the `TransparentUpgradeableProxy(logic, admin, data)` constructor arguments.
pub fn bridge_proxy_constructor_input(
    implementation: Address,
    admin: Address,
    init_calldata: Bytes,
) -> Bytes {
    (implementation, admin, init_calldata).abi_encode_params().into()
}

/// Encodes the L1 bridge's `initialize` call.
pub fn l1_bridge_initialize_calldata(
    factory_deps: Vec<Bytes>,
    l2_token_beacon: Address,
    governor: Address,
    deploy_implementation_fee: U256,
    deploy_proxy_fee: U256,
) -> Bytes {
    IL1Bridge::initializeCall {
        _factoryDeps: factory_deps,
        _l2TokenBeacon: l2_token_beacon,
        _governor: governor,
        _deployBridgeImplementationFee: deploy_implementation_fee,
        _deployBridgeProxyFee: deploy_proxy_fee,
    }
    .abi_encode()
    .into()
}
