//! Two-transaction bootstrap of a bridge's L2 counterpart.
//!
//! The first transaction publishes the token bytecodes on L2 through the mailbox. The
//! second calls the L1 bridge's `initialize`, which deploys the L2 bridge behind a proxy.
//! Both are signed with consecutive nonces before either is broadcast, then sent and
//! awaited concurrently. The publish outcome is recorded before the initialize outcome is
//! examined.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use era_bridge_primitives::{
    BridgeBytecodes, BridgeContractHashes, BridgeInitState, BridgeL2Addresses, BytecodeHasher,
    GasParams, InitStateError, PriorityTransaction, l1_bridge_initialize_calldata,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    BridgeConfig, BridgeError, ConfigError, BridgeResult, FeeEstimate, InitConfig, L1BridgeClient,
    MailboxClient, PriorityFeeEstimator,
    rpc::{L1Client, L1Transaction, TransactionOutcome, TransactionSigner},
};

/// Everything the initialization submits, computed before anything is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitPlan {
    /// Governor of the bridge.
    pub governor: Address,
    /// L1 gas price of both transactions.
    pub gas_price: u128,
    /// Bytecode hashes of the counterpart contracts.
    pub hashes: BridgeContractHashes,
    /// Where the counterpart contracts will live.
    pub addresses: BridgeL2Addresses,
    /// Bytecode publication request.
    pub publish: PriorityTransaction,
    /// Cost of the bytecode publication.
    pub publish_fee: FeeEstimate,
    /// Cost of deploying one counterpart contract.
    pub deploy_fee: U256,
    /// Calldata of the L1 bridge's `initialize`.
    pub initialize_calldata: Bytes,
    /// Value attached to `initialize`, one deploy fee per contract.
    pub initialize_value: U256,
}

/// Receipts of a completed initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    /// Where the counterpart contracts live.
    pub addresses: BridgeL2Addresses,
    /// Bytecode publication.
    pub publish: TransactionOutcome,
    /// Bridge initialization.
    pub initialize: TransactionOutcome,
}

/// Drives a bridge through its initialization states.
#[derive(Debug)]
pub struct BridgeInitSequencer<C, S> {
    bridge: BridgeConfig,
    config: InitConfig,
    client: Arc<C>,
    signer: S,
    hasher: BytecodeHasher,
    mailbox: MailboxClient<C>,
    l1_bridge: L1BridgeClient<C>,
    estimator: PriorityFeeEstimator<MailboxClient<C>>,
    /// Held for the whole submission, so nonces are read and used by one caller at a time.
    state: Mutex<BridgeInitState>,
}

impl<C: L1Client, S: TransactionSigner> BridgeInitSequencer<C, S> {
    /// Creates a sequencer for an unpublished bridge.
    pub fn new(
        bridge: BridgeConfig,
        config: InitConfig,
        client: Arc<C>,
        signer: S,
    ) -> BridgeResult<Self> {
        bridge.validate()?;
        config.validate()?;

        let mailbox = MailboxClient::new(config.mailbox_address, Arc::clone(&client));
        Ok(Self {
            l1_bridge: L1BridgeClient::new(bridge.bridge_l1_address, Arc::clone(&client)),
            estimator: PriorityFeeEstimator::new(mailbox.clone()),
            mailbox,
            hasher: BytecodeHasher::default(),
            state: Mutex::new(BridgeInitState::Unpublished),
            bridge,
            config,
            client,
            signer,
        })
    }

    /// Resumes from a known state.
    pub fn with_state(mut self, state: BridgeInitState) -> Self {
        self.state = Mutex::new(state);
        self
    }

    /// Sets the hasher used for the counterpart bytecodes.
    pub const fn with_hasher(mut self, hasher: BytecodeHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Returns the current state.
    pub async fn state(&self) -> BridgeInitState {
        *self.state.lock().await
    }

    /// Computes addresses, fees and calldata of the initialization without submitting.
    pub async fn plan(&self, bytecodes: &BridgeBytecodes) -> BridgeResult<InitPlan> {
        let hashes = bytecodes.hashes(&self.hasher)?;
        let governor = match self.config.governor {
            Some(governor) => governor,
            None => self.mailbox.governor().await?,
        };
        let gas_price = match self.config.gas_price {
            Some(gas_price) => gas_price,
            None => self.client.gas_price().await?,
        };
        let addresses =
            BridgeL2Addresses::compute(self.bridge.bridge_l1_address, governor, &hashes);

        let publish_fee = self
            .estimator
            .estimate(
                GasParams::new(
                    gas_price,
                    self.config.priority_tx_max_gas_limit,
                    self.config.gas_per_pubdata_byte,
                ),
                self.config.safety_margin,
            )
            .await?;
        let publish = PriorityTransaction::publish_bytecodes(
            bytecodes.publication_deps(),
            self.config.priority_tx_max_gas_limit,
            self.config.gas_per_pubdata_byte,
        )
        .with_refund_recipient(self.signer.address())
        .with_required_value(publish_fee.value);
        publish.ensure_covers(publish_fee.base_cost)?;

        let deploy_fee = self
            .estimator
            .estimate_base_cost(GasParams::new(
                gas_price,
                self.config.deploy_counterpart_gas_limit,
                self.config.gas_per_pubdata_byte,
            ))
            .await?;
        let initialize_calldata = l1_bridge_initialize_calldata(
            bytecodes.initialization_deps(),
            addresses.token_beacon,
            governor,
            deploy_fee,
            deploy_fee,
        );

        Ok(InitPlan {
            governor,
            gas_price,
            hashes,
            addresses,
            publish,
            publish_fee,
            deploy_fee,
            initialize_calldata,
            initialize_value: deploy_fee.saturating_mul(U256::from(2)),
        })
    }

    /// Publishes the bytecodes and initializes the bridge.
    ///
    /// The bridge must be unpublished. Any revert is fatal; nothing is retried or rolled
    /// back, and the state only advances past steps whose transaction succeeded.
    pub async fn initialize(&self, bytecodes: &BridgeBytecodes) -> BridgeResult<InitOutcome> {
        let mut state = self.state.lock().await;
        if *state != BridgeInitState::Unpublished {
            let transition = InitStateError::InvalidTransition {
                from: *state,
                to: BridgeInitState::BytecodesPublished,
            };
            return Err(transition.into());
        }

        let chain_id = self.client.chain_id().await?;
        if chain_id != self.bridge.chain_id {
            return Err(BridgeError::ChainIdMismatch {
                expected: self.bridge.chain_id,
                actual: chain_id,
            });
        }

        let plan = self.plan(bytecodes).await?;
        let sender = self.signer.address();
        let nonce = match self.config.nonce {
            Some(nonce) => nonce,
            None => self.client.pending_nonce(sender).await?,
        };

        let initialize_nonce = nonce.checked_add(1).ok_or(ConfigError::OutOfRange {
            field: "nonce",
            constraint: "below u64::MAX",
            value: nonce.to_string(),
        })?;

        // The mailbox takes the fee as the request's base amount, not as call value.
        let publish_tx = L1Transaction {
            to: self.mailbox.address(),
            value: U256::ZERO,
            input: plan.publish.calldata(),
            nonce,
            gas_limit: self.config.publish_l1_gas_limit,
            gas_price: plan.gas_price,
            chain_id,
        };
        let mut initialize_tx = L1Transaction {
            to: self.bridge.bridge_l1_address,
            value: plan.initialize_value,
            input: plan.initialize_calldata.clone(),
            nonce: initialize_nonce,
            gas_limit: 0,
            gas_price: plan.gas_price,
            chain_id,
        };
        initialize_tx.gas_limit = self.client.estimate_gas(sender, &initialize_tx).await?;

        let publish_signed = self.signer.sign_transaction(&publish_tx)?;
        let initialize_signed = self.signer.sign_transaction(&initialize_tx)?;
        info!(
            %sender,
            nonce,
            publish_tx = %publish_signed.hash,
            initialize_tx = %initialize_signed.hash,
            publish_value = %publish_tx.value,
            initialize_value = %initialize_tx.value,
            "Submitting bridge initialization"
        );

        // Both branches run to completion so a landed publish is recorded even when the
        // initialize submission fails.
        let confirmations = self.config.confirmations;
        let (publish, initialize) = tokio::join!(
            async {
                let hash = self.client.send_transaction(&publish_signed).await?;
                self.client.wait_for_transaction(hash, confirmations).await
            },
            async {
                let hash = self.client.send_transaction(&initialize_signed).await?;
                self.client.wait_for_transaction(hash, confirmations).await
            },
        );

        let publish = publish?;
        ensure_success(&publish, "publish bytecodes")?;
        state.advance(BridgeInitState::BytecodesPublished)?;
        info!(tx_hash = %publish.tx_hash, block = ?publish.block_number, "Bytecodes published");

        let initialize = initialize?;
        ensure_success(&initialize, "initialize bridge")?;
        let counterpart = self.l1_bridge.l2_bridge().await?;
        if counterpart != plan.addresses.bridge_proxy {
            return Err(BridgeError::CounterpartMismatch {
                expected: plan.addresses.bridge_proxy,
                actual: counterpart,
            });
        }
        state.advance(BridgeInitState::Initialized)?;
        info!(
            tx_hash = %initialize.tx_hash,
            block = ?initialize.block_number,
            l2_bridge = %counterpart,
            "Bridge initialized"
        );

        Ok(InitOutcome { addresses: plan.addresses, publish, initialize })
    }

    /// Records that governance has taken over the initialized bridge.
    pub async fn mark_governance_configured(&self) -> BridgeResult<()> {
        let mut state = self.state.lock().await;
        state.advance(BridgeInitState::GovernanceConfigured)?;
        info!(bridge = %self.bridge.bridge_l1_address, "Bridge governance configured");
        Ok(())
    }
}

fn ensure_success(outcome: &TransactionOutcome, stage: &'static str) -> BridgeResult<()> {
    if !outcome.success {
        return Err(BridgeError::TransactionReverted { stage, tx_hash: outcome.tx_hash });
    }
    debug!(tx_hash = %outcome.tx_hash, gas_used = outcome.gas_used, stage, "Transaction succeeded");
    Ok(())
}
