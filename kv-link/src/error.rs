#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("TiKV error: {0}")]
    TikvError(#[from] tikv_client::Error),
    #[error("Prost error: {0}")]
    DeserializationError(#[from] prost::DecodeError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid association: {0}")]
    InvalidAssociation(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Not found")]
    NotFound,
}
