//! Upgrade of the L2 wrapped ETH token to a version bound to its bridge.
//!
//! The token proxy already lives on L2. One priority transaction, sent by the proxy
//! admin, switches the implementation and calls `initializeV2` on it.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;

use crate::{
    DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT, PriorityTransaction, REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
    contracts::{IL2Weth, ITransparentUpgradeableProxy},
};

/// Addresses involved in the L2 WETH token upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WethTokenUpgrade {
    /// Proxy of the L2 WETH token.
    pub token_proxy: Address,
    /// New implementation of the L2 WETH token.
    pub token_implementation: Address,
    /// L2 side of the WETH bridge.
    pub l2_weth_bridge: Address,
    /// WETH token on L1.
    pub l1_weth_token: Address,
}

impl WethTokenUpgrade {
    /// Returns the L2 `upgradeToAndCall(implementation, initializeV2(bridge, l1Weth))` call.
    pub fn l2_calldata(&self) -> Bytes {
        let initialize = IL2Weth::initializeV2Call {
            _l2Bridge: self.l2_weth_bridge,
            _l1Address: self.l1_weth_token,
        }
        .abi_encode();
        ITransparentUpgradeableProxy::upgradeToAndCallCall {
            newImplementation: self.token_implementation,
            data: initialize.into(),
        }
        .abi_encode()
        .into()
    }

    /// Returns the priority transaction calling the token proxy.
    ///
    /// The proxy is already deployed, so nothing is published alongside.
    pub fn priority_transaction(&self) -> PriorityTransaction {
        PriorityTransaction::new(
            self.token_proxy,
            DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT,
            REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
        )
        .with_calldata(self.l2_calldata())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, address, hex};

    use super::*;
    use crate::contracts::IMailbox;

    fn upgrade() -> WethTokenUpgrade {
        WethTokenUpgrade {
            token_proxy: address!("000000000000000000000000000000000000a001"),
            token_implementation: address!("000000000000000000000000000000000000a002"),
            l2_weth_bridge: address!("000000000000000000000000000000000000a003"),
            l1_weth_token: address!("000000000000000000000000000000000000a004"),
        }
    }

    #[test]
    fn test_l2_calldata_nests_initialize() {
        let calldata = upgrade().l2_calldata();
        assert_eq!(calldata[..4], hex!("4f1ef286"));

        let upgrade_call =
            ITransparentUpgradeableProxy::upgradeToAndCallCall::abi_decode(&calldata).unwrap();
        assert_eq!(upgrade_call.newImplementation, upgrade().token_implementation);

        let expected = hex!(
            "0840ba72000000000000000000000000000000000000000000000000000000000000a003000000000000000000000000000000000000000000000000000000000000a004"
        );
        assert_eq!(upgrade_call.data.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_priority_transaction_targets_proxy() {
        let tx = upgrade().priority_transaction().with_required_value(U256::from(5u64));
        assert_eq!(tx.to, upgrade().token_proxy);
        assert_eq!(tx.l2_gas_limit, DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT);
        assert!(tx.factory_deps.is_empty());

        let request = IMailbox::requestL2TransactionCall::abi_decode(&tx.calldata()).unwrap();
        assert_eq!(request._request.l2Contract, upgrade().token_proxy);
        assert_eq!(request._calldata, upgrade().l2_calldata());
        assert_eq!(request._amount, U256::from(5u64));
    }
}
