use std::collections::VecDeque;

use auto_impl::auto_impl;

use crate::col::ColumnKeys;
use crate::collector::Exchange;
use crate::error::Result;
use crate::protocol::{Event, ExchangeOutcome};
use crate::record::Record;
use crate::summary::SummaryAggregator;
use crate::value::{Metadata, Value};

/// Trait that defines event callbacks for the responses of one exchange
///
/// The decoder invokes them in protocol order and never concurrently.
pub trait ResponseHandler {
    /// Column names of the upcoming records. `None` means the message carried no metadata.
    fn on_fields(&mut self, meta: Option<&Metadata>) -> Result<()>;
    fn on_record(&mut self, values: Vec<Value>) -> Result<()>;
    /// Completion metadata. The record stream is closed before the metadata is looked at.
    fn on_summary(&mut self, meta: Option<&Metadata>) -> Result<()>;
    fn on_bookmark(&mut self, meta: &Metadata) -> Result<()>;
    fn on_success(&mut self) -> Result<()>;
    fn on_failure(&mut self) -> Result<()>;
    fn on_ignored(&mut self) -> Result<()>;
}

/// How the records of an exchange are consumed
///
/// A mode is injected into a [`crate::collector::ResultCollector`] at construction.
/// It decides where records go and how a caller waits for column keys.
pub trait ConsumptionMode {
    /// Block, suspend or drain until the keys of `exchange` are known or the exchange is processed
    ///
    /// Implementations that pull from a decoder feed each event back through
    /// [`Exchange::handler`].
    fn ensure_keys_resolved<S: SummaryAggregator>(&mut self, exchange: &mut Exchange<S>)
    -> Result<()>;

    /// The record stream is closed. Called at most once per exchange.
    fn no_more_records(&mut self);

    /// Called once per record, in arrival order
    fn accept_record(&mut self, record: Record) -> Result<()>;

    /// Column keys arrived with the fields metadata
    fn keys_received(&mut self, _keys: &ColumnKeys) {}

    /// The exchange reached its terminal outcome
    fn exchange_processed(&mut self, _keys: &ColumnKeys, _outcome: ExchangeOutcome) {}
}

/// Pull side of a protocol decoder
#[auto_impl(&mut, Box)]
pub trait EventSource {
    /// Next decoded event, or `None` once the decoder has nothing more to give
    fn next_event(&mut self) -> Result<Option<Event>>;
}

impl EventSource for VecDeque<Event> {
    fn next_event(&mut self) -> Result<Option<Event>> {
        Ok(self.pop_front())
    }
}

impl EventSource for std::vec::IntoIter<Event> {
    fn next_event(&mut self) -> Result<Option<Event>> {
        Ok(self.next())
    }
}
