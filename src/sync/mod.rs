//! Eager-buffering consumption.
//!
//! The collector pulls events from an [`EventSource`] whenever a caller needs more:
//! keys, the next record, or the terminal outcome.

use std::collections::VecDeque;

use tracing::trace;

use crate::collector::{Exchange, ResultCollector};
use crate::error::{Error, Result, eyre};
use crate::opts::Opts;
use crate::protocol::{ConsumptionMode, EventSource, ExchangeOutcome};
use crate::record::Record;
use crate::summary::SummaryAggregator;

/// Buffers records in memory and drains the event source on demand
pub struct BufferedMode<E> {
    source: E,
    records: VecDeque<Record>,
    closed: bool,
}

impl<E: EventSource> BufferedMode<E> {
    pub fn new(source: E) -> Self {
        Self::with_opts(source, &Opts::default())
    }

    pub fn with_opts(source: E, opts: &Opts) -> Self {
        Self {
            source,
            records: VecDeque::with_capacity(opts.buffer_capacity),
            closed: false,
        }
    }

    /// Number of records received but not yet taken
    pub fn buffered(&self) -> usize {
        self.records.len()
    }

    /// Whether no-more-records has been signaled
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Pull one event from the source and apply it
    #[tracing::instrument(skip_all)]
    fn pump<S: SummaryAggregator>(&mut self, exchange: &mut Exchange<S>) -> Result<()> {
        let Some(event) = self.source.next_event()? else {
            return Err(Error::IncompleteExchange);
        };
        trace!(terminal = event.is_terminal(), "event");
        event.dispatch(&mut exchange.handler(self))
    }
}

impl<E: EventSource> ConsumptionMode for BufferedMode<E> {
    fn ensure_keys_resolved<S: SummaryAggregator>(
        &mut self,
        exchange: &mut Exchange<S>,
    ) -> Result<()> {
        while !exchange.keys_known() && !exchange.is_processed() {
            self.pump(exchange)?;
        }
        Ok(())
    }

    fn no_more_records(&mut self) {
        self.closed = true;
    }

    fn accept_record(&mut self, record: Record) -> Result<()> {
        self.records.push_back(record);
        Ok(())
    }
}

impl<E: EventSource, S: SummaryAggregator> ResultCollector<BufferedMode<E>, S> {
    /// Next record of the result, pulling events until one is buffered or the stream ends
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let (exchange, mode) = self.parts_mut();
        loop {
            if let Some(record) = mode.records.pop_front() {
                return Ok(Some(record));
            }
            if mode.closed || exchange.is_processed() {
                return Ok(None);
            }
            mode.pump(exchange)?;
        }
    }

    /// All remaining records. The exchange is driven to its outcome.
    pub fn fetch_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        self.consume()?;
        Ok(records)
    }

    /// Drive the exchange to its outcome, discarding any records
    pub fn consume(&mut self) -> Result<ExchangeOutcome> {
        let (exchange, mode) = self.parts_mut();
        mode.records.clear();
        while !exchange.is_processed() {
            mode.pump(exchange)?;
            mode.records.clear();
        }
        exchange
            .outcome()
            .ok_or_else(|| Error::LibraryBug(eyre!("processed exchange without an outcome")))
    }
}
