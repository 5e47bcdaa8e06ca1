//! ABI bindings of the L1 and L2 contracts the bridge talks to.

use alloy_sol_types::sol;

sol! {
    /// Entry points of the rollup's L1 mailbox.
    interface IMailbox {
        /// L2 side of a priority request.
        struct L2TransactionRequest {
            address l2Contract;
            uint256 l2Value;
            uint256 l2GasLimit;
            uint256 l2GasPerPubdataByteLimit;
        }

        /// Requests execution of a transaction on L2, paying `_amount` for it.
        function requestL2Transaction(
            L2TransactionRequest calldata _request,
            bytes calldata _calldata,
            bytes[] calldata _factoryDeps,
            address _refundRecipient,
            uint256 _amount
        ) external returns (bytes32 canonicalTxHash);

        /// Returns the minimum value a priority transaction must carry.
        function l2TransactionBaseCost(
            uint256 _gasPrice,
            uint256 _l2GasLimit,
            uint256 _l2GasPerPubdataByteLimit
        ) external view returns (uint256);

        /// Returns the governor of the rollup.
        function getGovernor() external view returns (address);

        /// Returns the root of the L2 to L1 logs tree of an executed batch.
        function l2LogsRootHash(uint256 _batchNumber) external view returns (bytes32 hash);

        /// Finalizes an ETH withdrawal of the given chain.
        function finalizeEthWithdrawal(
            uint256 _chainId,
            uint256 _l2BatchNumber,
            uint256 _l2MessageIndex,
            uint16 _l2TxNumberInBatch,
            bytes calldata _message,
            bytes32[] calldata _merkleProof
        ) external;
    }

    /// Entry points of the L1 side of the bridge.
    interface IL1Bridge {
        /// Deploys and initializes the L2 counterpart.
        function initialize(
            bytes[] calldata _factoryDeps,
            address _l2TokenBeacon,
            address _governor,
            uint256 _deployBridgeImplementationFee,
            uint256 _deployBridgeProxyFee
        ) external payable;

        /// Returns the address of the L2 counterpart.
        function l2Bridge() external view returns (address);

        /// Returns whether a withdrawal has been finalized.
        function isWithdrawalFinalized(uint256 _l2BatchNumber, uint256 _l2MessageIndex)
            external
            view
            returns (bool);

        /// Unlocks the funds of a withdrawal initiated on L2.
        function finalizeWithdrawal(
            uint256 _l2BatchNumber,
            uint256 _l2MessageIndex,
            uint16 _l2TxNumberInBatch,
            bytes calldata _message,
            bytes32[] calldata _merkleProof
        ) external;
    }

    /// Entry points of the L2 side of the bridge.
    interface IL2Bridge {
        /// Initializes the L2 bridge behind its proxy.
        function initialize(
            address _l1Bridge,
            bytes32 _l2TokenProxyBytecodeHash,
            address _governor
        ) external;
    }

    /// Wrapped ETH token on L2.
    interface IL2Weth {
        /// Binds the token to its L2 bridge and L1 counterpart.
        function initializeV2(address _l2Bridge, address _l1Address) external;
    }

    /// Admin surface of a transparent upgradeable proxy.
    interface ITransparentUpgradeableProxy {
        /// Switches the implementation and calls it with `data`.
        function upgradeToAndCall(address newImplementation, bytes calldata data)
            external
            payable;
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolCall;

    use super::*;

    #[test]
    fn test_selectors() {
        assert_eq!(IMailbox::requestL2TransactionCall::SELECTOR, [0x67, 0x34, 0x59, 0xad]);
        assert_eq!(IMailbox::finalizeEthWithdrawalCall::SELECTOR, [0x0f, 0xde, 0xf2, 0x51]);
        assert_eq!(IL1Bridge::finalizeWithdrawalCall::SELECTOR, [0x11, 0xa2, 0xcc, 0xc1]);
        assert_eq!(IL1Bridge::initializeCall::SELECTOR, [0xa0, 0x47, 0x37, 0x85]);
        assert_eq!(IL2Weth::initializeV2Call::SELECTOR, [0x08, 0x40, 0xba, 0x72]);
        assert_eq!(
            ITransparentUpgradeableProxy::upgradeToAndCallCall::SELECTOR,
            [0x4f, 0x1e, 0xf2, 0x86]
        );
    }
}
