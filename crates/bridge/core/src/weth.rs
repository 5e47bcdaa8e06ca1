//! Upgrade of the L2 WETH token through a mailbox priority transaction.
//!
//! The request either goes out as a governance call, printed for the proxy admin to
//! submit, or is signed and sent directly when the signer is the admin.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use serde::Serialize;
use tracing::info;

use crate::{
    BridgeError, BridgeResult, MailboxClient, PriorityFeeEstimator, WethInitConfig,
    rpc::{L1Client, L1Transaction, TransactionOutcome, TransactionSigner},
};

/// A mailbox call for governance to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceCall {
    /// Mailbox address.
    pub to: Address,
    /// Encoded `requestL2Transaction` call.
    pub data: Bytes,
    /// Value of the L1 call.
    pub value: U256,
    /// Amount the request pays, the mailbox base cost at `gas_price`.
    pub amount: U256,
    /// Gas price the amount was quoted at. The submission must not pay more.
    pub gas_price: u128,
}

/// Sends the L2 WETH token upgrade through the mailbox.
#[derive(Debug)]
pub struct WethTokenInitializer<C> {
    config: WethInitConfig,
    client: Arc<C>,
    estimator: PriorityFeeEstimator<MailboxClient<C>>,
}

impl<C: L1Client> WethTokenInitializer<C> {
    /// Creates an initializer for the token in `config`.
    pub fn new(config: WethInitConfig, client: Arc<C>) -> BridgeResult<Self> {
        config.validate()?;
        let mailbox = MailboxClient::new(config.mailbox_address, Arc::clone(&client));
        Ok(Self { config, client, estimator: PriorityFeeEstimator::new(mailbox) })
    }

    async fn gas_price(&self) -> BridgeResult<u128> {
        match self.config.gas_price {
            Some(gas_price) => Ok(gas_price),
            None => Ok(self.client.gas_price().await?),
        }
    }

    /// Builds the governance call, paying exactly the base cost with no refund recipient.
    pub async fn prepare_governance_call(&self) -> BridgeResult<GovernanceCall> {
        let gas_price = self.gas_price().await?;
        let request = self.config.upgrade.priority_transaction();
        let base_cost =
            self.estimator.estimate_base_cost(request.gas_params(gas_price)).await?;
        let request = request.with_required_value(base_cost);

        Ok(GovernanceCall {
            to: self.config.mailbox_address,
            data: request.calldata(),
            value: U256::ZERO,
            amount: base_cost,
            gas_price,
        })
    }

    /// Signs and sends the upgrade, refunding unspent L2 gas to the signer.
    ///
    /// The signer must be the admin of the token proxy, otherwise the L2 call reverts.
    pub async fn submit<S: TransactionSigner>(
        &self,
        signer: &S,
    ) -> BridgeResult<TransactionOutcome> {
        let chain_id = self.client.chain_id().await?;
        let gas_price = self.gas_price().await?;
        let sender = signer.address();

        let request = self.config.upgrade.priority_transaction().with_refund_recipient(sender);
        let fee = self
            .estimator
            .estimate(request.gas_params(gas_price), self.config.safety_margin)
            .await?;
        let request = request.with_required_value(fee.value);
        request.ensure_covers(fee.base_cost)?;

        let nonce = match self.config.nonce {
            Some(nonce) => nonce,
            None => self.client.pending_nonce(sender).await?,
        };
        let mut tx = L1Transaction {
            to: self.config.mailbox_address,
            value: U256::ZERO,
            input: request.calldata(),
            nonce,
            gas_limit: 0,
            gas_price,
            chain_id,
        };
        tx.gas_limit = self.client.estimate_gas(sender, &tx).await?;

        let signed = signer.sign_transaction(&tx)?;
        info!(
            %sender,
            nonce,
            tx_hash = %signed.hash,
            token = %self.config.upgrade.token_proxy,
            amount = %fee.value,
            "Submitting L2 WETH token upgrade"
        );
        let hash = self.client.send_transaction(&signed).await?;
        let outcome = self.client.wait_for_transaction(hash, self.config.confirmations).await?;
        if !outcome.success {
            return Err(BridgeError::TransactionReverted {
                stage: "initialize L2 WETH token",
                tx_hash: outcome.tx_hash,
            });
        }
        info!(tx_hash = %outcome.tx_hash, gas_used = outcome.gas_used, "L2 WETH token initialized");
        Ok(outcome)
    }
}
