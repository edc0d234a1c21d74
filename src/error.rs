use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractLedgerError {
    #[error("Contract at position {0} has an empty contract_id")]
    EmptyContractId(usize),

    #[error("Duplicate contract_id: {0}")]
    DuplicateContractId(String),

    #[error("Duplicate carrier in catalog: {0}")]
    DuplicateCarrier(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContractLedgerError>;
