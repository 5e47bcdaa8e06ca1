//! Local key signing for L1 transactions.

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, TxKind};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use super::{L1Transaction, RpcError, RpcResult, SignedTransaction, TransactionSigner};

/// Signs legacy transactions with an in-process private key.
#[derive(Debug, Clone)]
pub struct LocalTransactionSigner {
    signer: PrivateKeySigner,
}

impl LocalTransactionSigner {
    /// Wraps `signer`.
    pub const fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

impl TransactionSigner for LocalTransactionSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn sign_transaction(&self, tx: &L1Transaction) -> RpcResult<SignedTransaction> {
        let unsigned = TxLegacy {
            chain_id: Some(tx.chain_id),
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            input: tx.input.clone(),
        };
        let signature = self
            .signer
            .sign_hash_sync(&unsigned.signature_hash())
            .map_err(|e| RpcError::Signing(e.to_string()))?;
        let envelope = TxEnvelope::from(unsigned.into_signed(signature));

        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            nonce: tx.nonce,
            raw: envelope.encoded_2718().into(),
        })
    }
}
