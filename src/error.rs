use thiserror::Error;

use crate::protocol::ExchangeOutcome;

pub use color_eyre::eyre::eyre;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported metadata: should not get a bookmark on a result. bookmark = {bookmark}")]
    UnsupportedMetadata { bookmark: String },

    #[error("Malformed record: {actual} values for {expected} keys")]
    MalformedRecord { expected: usize, actual: usize },

    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("Exchange already completed with {previous}, cannot complete again with {attempted}")]
    OutcomeAlreadyRecorded {
        previous: ExchangeOutcome,
        attempted: ExchangeOutcome,
    },

    #[error("Exchange already completed with {outcome}, no further metadata is accepted")]
    ExchangeAlreadyProcessed { outcome: ExchangeOutcome },

    #[error("Record or fields event arrived after the record stream was closed")]
    RecordStreamClosed,

    #[error("Exchange is broken by an earlier error")]
    BrokenExchange,

    #[error("Event source ended before the exchange completed")]
    IncompleteExchange,

    #[error("Bad usage error: {0}")]
    BadUsageError(String),

    #[error("Library bug: {0}")]
    LibraryBug(color_eyre::Report),
}

pub type Result<T> = std::result::Result<T, Error>;
