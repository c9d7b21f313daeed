pub mod col;
pub mod collector;
pub mod constant;
pub mod error;
mod opts;
pub mod protocol;
pub mod record;
pub mod summary;
pub mod sync;
pub mod value;

pub use col::ColumnKeys;
pub use collector::{Exchange, ExchangeState, ResultCollector};
pub use opts::Opts;
pub use protocol::{ConsumptionMode, Event, EventSource, ExchangeOutcome, ResponseHandler};
pub use record::Record;
pub use value::{Metadata, Value};

#[cfg(feature = "tokio")]
pub mod tokio;

#[cfg(test)]
mod col_test;
#[cfg(test)]
mod opts_test;
