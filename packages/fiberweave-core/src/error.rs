use thiserror::Error;

use crate::ids::FiberId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown fiber: {0:?}")]
    UnknownFiber(FiberId),
    #[error("stale fiber handle: {0:?}")]
    StaleFiber(FiberId),
    #[error("invalid chain: {0}")]
    InvalidChain(String),
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("config error: {0}")]
    Config(String),
}
