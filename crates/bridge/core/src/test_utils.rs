//! Shared test utilities: an in-memory L1 and a recording signer.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use alloy_primitives::{Address, B256, Bytes, U256, address, keccak256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use era_bridge_primitives::{
    BridgeBytecodes, FAIR_L2_GAS_PRICE,
    contracts::{IL1Bridge, IMailbox},
};
use tokio::sync::Barrier;
use url::Url;

use crate::{
    BridgeConfig,
    rpc::{
        L1Client, L1Transaction, RpcError, RpcResult, SignedTransaction, TransactionOutcome,
        TransactionSigner,
    },
};

pub(crate) const CHAIN_ID: u64 = 9;
pub(crate) const L1_BRIDGE: Address = address!("1000000000000000000000000000000000000001");
pub(crate) const L2_BRIDGE: Address = address!("3333333333333333333333333333333333333333");
pub(crate) const MAILBOX: Address = address!("2000000000000000000000000000000000000002");

pub(crate) fn bridge_config() -> BridgeConfig {
    BridgeConfig {
        rpc_endpoint: Url::parse("http://localhost:8545").unwrap(),
        bridge_l1_address: L1_BRIDGE,
        bridge_l2_counterpart_address: L2_BRIDGE,
        chain_id: CHAIN_ID,
    }
}

fn word_code(fill: u8, words: usize) -> Bytes {
    Bytes::from(vec![fill; words * 32])
}

pub(crate) fn bytecodes() -> BridgeBytecodes {
    BridgeBytecodes {
        l2_bridge_implementation: word_code(1, 1),
        l2_bridge_proxy: word_code(2, 3),
        l2_token_proxy: word_code(3, 5),
        l2_standard_token: word_code(4, 7),
        l2_token_beacon: word_code(5, 9),
    }
}

/// In-memory L1 serving the mailbox and bridge views the services read.
#[derive(Debug)]
pub(crate) struct MockL1 {
    chain_id: u64,
    gas_price: u128,
    pending_nonce: u64,
    gas_estimate: u64,
    base_cost_per_gas: U256,
    governor: Address,
    logs_roots: HashMap<u64, B256>,
    finalized: HashSet<(u64, u64)>,
    raw_outputs: HashMap<Address, Bytes>,
    fail_calls: bool,
    reject_sends: bool,
    reverted_nonces: HashSet<u64>,
    failed_wait_nonces: HashSet<u64>,
    send_barrier: Option<Barrier>,
    l2_bridge: Mutex<Address>,
    calls: Mutex<Vec<Address>>,
    sent: Mutex<Vec<u64>>,
    reverted_hashes: Mutex<HashSet<B256>>,
    failed_wait_hashes: Mutex<HashSet<B256>>,
}

impl MockL1 {
    pub(crate) fn new() -> Self {
        Self {
            chain_id: CHAIN_ID,
            gas_price: 1_000_000_000,
            pending_nonce: 0,
            gas_estimate: 500_000,
            base_cost_per_gas: U256::from(FAIR_L2_GAS_PRICE),
            governor: Address::ZERO,
            logs_roots: HashMap::new(),
            finalized: HashSet::new(),
            raw_outputs: HashMap::new(),
            fail_calls: false,
            reject_sends: false,
            reverted_nonces: HashSet::new(),
            failed_wait_nonces: HashSet::new(),
            send_barrier: None,
            l2_bridge: Mutex::new(Address::ZERO),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            reverted_hashes: Mutex::new(HashSet::new()),
            failed_wait_hashes: Mutex::new(HashSet::new()),
        }
    }

    pub(crate) const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub(crate) const fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub(crate) const fn with_pending_nonce(mut self, nonce: u64) -> Self {
        self.pending_nonce = nonce;
        self
    }

    pub(crate) const fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    pub(crate) const fn with_base_cost_per_gas(mut self, per_gas: U256) -> Self {
        self.base_cost_per_gas = per_gas;
        self
    }

    pub(crate) const fn with_governor(mut self, governor: Address) -> Self {
        self.governor = governor;
        self
    }

    pub(crate) fn with_logs_root(mut self, batch: u64, root: B256) -> Self {
        self.logs_roots.insert(batch, root);
        self
    }

    pub(crate) fn with_finalized_withdrawal(mut self, batch: u64, index: u64) -> Self {
        self.finalized.insert((batch, index));
        self
    }

    pub(crate) fn with_raw_output(mut self, to: Address, output: Vec<u8>) -> Self {
        self.raw_outputs.insert(to, output.into());
        self
    }

    pub(crate) fn with_reverted_nonce(mut self, nonce: u64) -> Self {
        self.reverted_nonces.insert(nonce);
        self
    }

    /// Accepts the send at `nonce` but times out waiting for its receipt.
    pub(crate) fn with_failed_wait_nonce(mut self, nonce: u64) -> Self {
        self.failed_wait_nonces.insert(nonce);
        self
    }

    /// Holds every send until `parties` sends are in flight.
    pub(crate) fn with_send_barrier(mut self, parties: usize) -> Self {
        self.send_barrier = Some(Barrier::new(parties));
        self
    }

    pub(crate) const fn failing_calls(mut self) -> Self {
        self.fail_calls = true;
        self
    }

    pub(crate) const fn rejecting_sends(mut self) -> Self {
        self.reject_sends = true;
        self
    }

    pub(crate) fn set_l2_bridge(&self, l2_bridge: Address) {
        *self.l2_bridge.lock().unwrap() = l2_bridge;
    }

    pub(crate) fn calls_to(&self, to: Address) -> usize {
        self.calls.lock().unwrap().iter().filter(|called| **called == to).count()
    }

    pub(crate) fn sent_nonces(&self) -> Vec<u64> {
        self.sent.lock().unwrap().clone()
    }

    fn dispatch(&self, data: &[u8]) -> RpcResult<Vec<u8>> {
        let selector = data.get(..4).unwrap_or_default();
        let invalid = |e: alloy_sol_types::Error| RpcError::InvalidResponse(e.to_string());

        if selector == IMailbox::l2TransactionBaseCostCall::SELECTOR {
            let call = IMailbox::l2TransactionBaseCostCall::abi_decode(data).map_err(invalid)?;
            Ok((self.base_cost_per_gas * call._l2GasLimit).abi_encode())
        } else if selector == IMailbox::getGovernorCall::SELECTOR {
            Ok(self.governor.abi_encode())
        } else if selector == IMailbox::l2LogsRootHashCall::SELECTOR {
            let call = IMailbox::l2LogsRootHashCall::abi_decode(data).map_err(invalid)?;
            let batch = call._batchNumber.to::<u64>();
            Ok(self.logs_roots.get(&batch).copied().unwrap_or_default().abi_encode())
        } else if selector == IL1Bridge::l2BridgeCall::SELECTOR {
            Ok(self.l2_bridge.lock().unwrap().abi_encode())
        } else if selector == IL1Bridge::isWithdrawalFinalizedCall::SELECTOR {
            let call = IL1Bridge::isWithdrawalFinalizedCall::abi_decode(data).map_err(invalid)?;
            let key = (call._l2BatchNumber.to::<u64>(), call._l2MessageIndex.to::<u64>());
            Ok(self.finalized.contains(&key).abi_encode())
        } else {
            Err(RpcError::InvalidResponse(format!("mock: unknown selector {selector:?}")))
        }
    }
}

#[async_trait]
impl L1Client for MockL1 {
    async fn chain_id(&self) -> RpcResult<u64> {
        Ok(self.chain_id)
    }

    async fn gas_price(&self) -> RpcResult<u128> {
        Ok(self.gas_price)
    }

    async fn pending_nonce(&self, _: Address) -> RpcResult<u64> {
        Ok(self.pending_nonce)
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> RpcResult<Bytes> {
        self.calls.lock().unwrap().push(to);
        if self.fail_calls {
            return Err(RpcError::Connection("mock: connection refused".into()));
        }
        if let Some(output) = self.raw_outputs.get(&to) {
            return Ok(output.clone());
        }
        self.dispatch(&data).map(Bytes::from)
    }

    async fn estimate_gas(&self, _: Address, _: &L1Transaction) -> RpcResult<u64> {
        Ok(self.gas_estimate)
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> RpcResult<B256> {
        if self.reject_sends {
            return Err(RpcError::Rejected("mock: insufficient funds".into()));
        }
        if let Some(barrier) = &self.send_barrier {
            barrier.wait().await;
        }
        self.sent.lock().unwrap().push(tx.nonce);
        if self.reverted_nonces.contains(&tx.nonce) {
            self.reverted_hashes.lock().unwrap().insert(tx.hash);
        }
        if self.failed_wait_nonces.contains(&tx.nonce) {
            self.failed_wait_hashes.lock().unwrap().insert(tx.hash);
        }
        Ok(tx.hash)
    }

    async fn wait_for_transaction(
        &self,
        tx_hash: B256,
        _confirmations: u64,
    ) -> RpcResult<TransactionOutcome> {
        if self.failed_wait_hashes.lock().unwrap().contains(&tx_hash) {
            return Err(RpcError::Timeout(format!("mock: no receipt for {tx_hash}")));
        }
        let success = !self.reverted_hashes.lock().unwrap().contains(&tx_hash);
        Ok(TransactionOutcome { tx_hash, block_number: Some(100), success, gas_used: 21_000 })
    }
}

/// Signer that records every transaction it signs.
#[derive(Debug, Clone)]
pub(crate) struct MockSigner {
    signed: Arc<Mutex<Vec<L1Transaction>>>,
}

impl MockSigner {
    pub(crate) fn new() -> Self {
        Self { signed: Arc::new(Mutex::new(Vec::new())) }
    }

    pub(crate) fn signed(&self) -> Vec<L1Transaction> {
        self.signed.lock().unwrap().clone()
    }
}

impl TransactionSigner for MockSigner {
    fn address(&self) -> Address {
        address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
    }

    fn sign_transaction(&self, tx: &L1Transaction) -> RpcResult<SignedTransaction> {
        self.signed.lock().unwrap().push(tx.clone());
        let raw: Bytes = (tx.to, U256::from(tx.nonce)).abi_encode_params().into();
        Ok(SignedTransaction { hash: keccak256(&raw), nonce: tx.nonce, raw })
    }
}
