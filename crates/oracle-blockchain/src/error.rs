use alloy::{
    contract::Error as ContractError,
    primitives::TxHash,
    signers::local::LocalSignerError,
    transports::{RpcError, TransportErrorKind},
};

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Invalid private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("RPC connection failed after trying {attempts} endpoint(s)")]
    RpcConnectionFailed { attempts: usize },

    #[error("Transaction receipt failed: {reason}")]
    ReceiptFailed { reason: String },

    #[error("Transaction {tx_hash} reverted: {contract}::{function}")]
    TransactionReverted {
        contract: &'static str,
        function: &'static str,
        tx_hash: TxHash,
    },
}
