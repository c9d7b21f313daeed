//! Response collection for a single exchange.
//!
//! [`Exchange`] holds the per-exchange state: column keys, the `Pending`/`Processed` tag,
//! whether the record stream is closed, and the summary aggregator.
//! [`ResultCollector`] pairs one exchange with the [`ConsumptionMode`] that decides where
//! records go and how a caller waits for the keys.

use tracing::{debug, trace, warn};

use crate::col::ColumnKeys;
use crate::constant::BOOKMARK_KEY;
use crate::error::{Error, Result, eyre};
use crate::opts::Opts;
use crate::protocol::{ConsumptionMode, Event, ExchangeOutcome, ResponseHandler};
use crate::record::Record;
use crate::summary::{ServerInfo, Statement, SummaryAggregator, SummaryCollector};
use crate::value::{Metadata, Value};

/// Progress of an exchange. `Processed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Pending,
    Processed(ExchangeOutcome),
}

/// State of one request/response exchange
#[derive(Debug)]
pub struct Exchange<S = SummaryCollector> {
    opts: Opts,
    keys: ColumnKeys,
    /// A fields event with metadata has been applied
    fields_received: bool,
    /// Keys have been read or bound to a record and can no longer change
    keys_frozen: bool,
    state: ExchangeState,
    records_closed: bool,
    broken: bool,
    summary: S,
}

impl<S: SummaryAggregator> Exchange<S> {
    pub fn new(summary: S, opts: Opts) -> Self {
        Self {
            opts,
            keys: ColumnKeys::default(),
            fields_received: false,
            keys_frozen: false,
            state: ExchangeState::Pending,
            records_closed: false,
            broken: false,
            summary,
        }
    }

    /// Callbacks that apply events to this exchange and forward records to `mode`
    pub fn handler<'a, M: ConsumptionMode>(
        &'a mut self,
        mode: &'a mut M,
    ) -> ExchangeHandler<'a, S, M> {
        ExchangeHandler {
            exchange: self,
            mode,
        }
    }

    /// Whether the fields metadata has arrived
    pub fn keys_known(&self) -> bool {
        self.fields_received
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.state, ExchangeState::Processed(_))
    }

    pub fn outcome(&self) -> Option<ExchangeOutcome> {
        match self.state {
            ExchangeState::Pending => None,
            ExchangeState::Processed(outcome) => Some(outcome),
        }
    }

    pub fn records_closed(&self) -> bool {
        self.records_closed
    }

    /// Whether an earlier event failed with a fatal error
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn summary(&self) -> &S {
        &self.summary
    }

    fn check_bookmark(&mut self, meta: &Metadata) -> Result<()> {
        match meta.get(BOOKMARK_KEY) {
            Some(bookmark) => self.reject_bookmark(bookmark),
            None => Ok(()),
        }
    }

    fn reject_bookmark(&mut self, bookmark: &Value) -> Result<()> {
        let bookmark = bookmark
            .as_str()
            .map_or_else(|| format!("<{}>", bookmark.type_name()), ToString::to_string);
        if self.opts.reject_bookmarks {
            return Err(self.poison(Error::UnsupportedMetadata { bookmark }));
        }
        warn!(%bookmark, "bookmark on a result");
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        match self.state {
            ExchangeState::Pending => Ok(()),
            ExchangeState::Processed(outcome) => Err(Error::ExchangeAlreadyProcessed { outcome }),
        }
    }

    fn poison(&mut self, err: Error) -> Error {
        debug!(error = %err, "exchange broken");
        self.broken = true;
        err
    }

    fn close_records<M: ConsumptionMode>(&mut self, mode: &mut M) {
        if !self.records_closed {
            self.records_closed = true;
            mode.no_more_records();
        }
    }

    fn complete<M: ConsumptionMode>(
        &mut self,
        outcome: ExchangeOutcome,
        mode: &mut M,
    ) -> Result<()> {
        if let ExchangeState::Processed(previous) = self.state {
            return Err(Error::OutcomeAlreadyRecorded {
                previous,
                attempted: outcome,
            });
        }
        // success leaves the stream as the summary path left it
        if outcome != ExchangeOutcome::Success {
            self.close_records(mode);
        }
        self.state = ExchangeState::Processed(outcome);
        debug!(%outcome, keys = self.keys.len(), "exchange processed");
        mode.exchange_processed(&self.keys, outcome);
        Ok(())
    }
}

/// [`ResponseHandler`] view over an [`Exchange`] and its consumption mode
pub struct ExchangeHandler<'a, S, M> {
    exchange: &'a mut Exchange<S>,
    mode: &'a mut M,
}

impl<S: SummaryAggregator, M: ConsumptionMode> ResponseHandler for ExchangeHandler<'_, S, M> {
    fn on_fields(&mut self, meta: Option<&Metadata>) -> Result<()> {
        let exchange = &mut *self.exchange;
        if exchange.broken {
            return Err(Error::BrokenExchange);
        }
        exchange.ensure_pending()?;
        if exchange.records_closed {
            return Err(Error::RecordStreamClosed);
        }
        let Some(meta) = meta else {
            trace!("fields without metadata");
            return Ok(());
        };
        exchange.check_bookmark(meta)?;
        let keys = ColumnKeys::from_metadata(meta).map_err(|e| exchange.poison(e))?;

        if exchange.fields_received {
            warn!("fields metadata received twice in one exchange");
        }
        if exchange.keys_frozen {
            warn!(
                kept = exchange.keys.len(),
                dropped = keys.len(),
                "keys already in use, ignoring new fields"
            );
        } else {
            exchange.keys = keys;
        }
        exchange.fields_received = true;
        trace!(keys = ?exchange.keys.as_slice(), "fields");

        exchange.summary.collect_with_fields(meta);
        self.mode.keys_received(&exchange.keys);
        Ok(())
    }

    fn on_record(&mut self, values: Vec<Value>) -> Result<()> {
        let exchange = &mut *self.exchange;
        if exchange.broken {
            return Err(Error::BrokenExchange);
        }
        if exchange.records_closed || exchange.is_processed() {
            return Err(Error::RecordStreamClosed);
        }
        let record =
            Record::new(exchange.keys.clone(), values).map_err(|e| exchange.poison(e))?;
        exchange.keys_frozen = true;
        trace!(values = record.len(), "record");
        self.mode.accept_record(record)
    }

    fn on_summary(&mut self, meta: Option<&Metadata>) -> Result<()> {
        let exchange = &mut *self.exchange;
        exchange.ensure_pending()?;
        exchange.close_records(&mut *self.mode);
        let Some(meta) = meta else {
            return Ok(());
        };
        exchange.check_bookmark(meta)?;
        exchange.summary.collect(meta);
        Ok(())
    }

    fn on_bookmark(&mut self, meta: &Metadata) -> Result<()> {
        let exchange = &mut *self.exchange;
        exchange.ensure_pending()?;
        let bookmark = meta.get(BOOKMARK_KEY).cloned().unwrap_or_default();
        exchange.reject_bookmark(&bookmark)?;
        exchange.summary.collect(meta);
        Ok(())
    }

    fn on_success(&mut self) -> Result<()> {
        self.exchange.complete(ExchangeOutcome::Success, &mut *self.mode)
    }

    fn on_failure(&mut self) -> Result<()> {
        self.exchange.complete(ExchangeOutcome::Failure, &mut *self.mode)
    }

    fn on_ignored(&mut self) -> Result<()> {
        self.exchange.complete(ExchangeOutcome::Ignored, &mut *self.mode)
    }
}

/// Collects the responses of one exchange into a queryable result
///
/// Each exchange gets its own collector. The decoder drives it through [`ResponseHandler`];
/// callers read [`ResultCollector::keys`], which resolves lazily through the consumption mode.
#[derive(Debug)]
pub struct ResultCollector<M, S = SummaryCollector> {
    exchange: Exchange<S>,
    mode: M,
}

impl<M: ConsumptionMode> ResultCollector<M> {
    pub fn new(mode: M, statement: Statement, server: ServerInfo) -> Self {
        Self::with_summary(mode, SummaryCollector::new(statement, server), Opts::default())
    }
}

impl<M: ConsumptionMode, S: SummaryAggregator> ResultCollector<M, S> {
    pub fn with_summary(mode: M, summary: S, opts: Opts) -> Self {
        Self {
            exchange: Exchange::new(summary, opts),
            mode,
        }
    }

    /// Column keys of the result
    ///
    /// The first call on a pending exchange asks the consumption mode to resolve the keys.
    /// Later calls return the same keys without resolving again.
    pub fn keys(&mut self) -> Result<&ColumnKeys> {
        if !self.exchange.keys_frozen {
            if !self.exchange.is_processed() {
                self.mode.ensure_keys_resolved(&mut self.exchange)?;
            }
            if !self.exchange.keys_known() && !self.exchange.is_processed() {
                return Err(Error::LibraryBug(eyre!(
                    "consumption mode returned before the keys were resolved"
                )));
            }
            self.exchange.keys_frozen = true;
        }
        Ok(&self.exchange.keys)
    }

    /// Apply one decoded event
    pub fn handle(&mut self, event: Event) -> Result<()> {
        event.dispatch(self)
    }

    pub fn exchange(&self) -> &Exchange<S> {
        &self.exchange
    }

    pub fn outcome(&self) -> Option<ExchangeOutcome> {
        self.exchange.outcome()
    }

    pub fn summary(&self) -> &S {
        &self.exchange.summary
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut M {
        &mut self.mode
    }

    pub fn into_parts(self) -> (M, S) {
        (self.mode, self.exchange.summary)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Exchange<S>, &mut M) {
        (&mut self.exchange, &mut self.mode)
    }

    fn handler(&mut self) -> ExchangeHandler<'_, S, M> {
        self.exchange.handler(&mut self.mode)
    }
}

impl<M: ConsumptionMode, S: SummaryAggregator> ResponseHandler for ResultCollector<M, S> {
    fn on_fields(&mut self, meta: Option<&Metadata>) -> Result<()> {
        self.handler().on_fields(meta)
    }

    fn on_record(&mut self, values: Vec<Value>) -> Result<()> {
        self.handler().on_record(values)
    }

    fn on_summary(&mut self, meta: Option<&Metadata>) -> Result<()> {
        self.handler().on_summary(meta)
    }

    fn on_bookmark(&mut self, meta: &Metadata) -> Result<()> {
        self.handler().on_bookmark(meta)
    }

    fn on_success(&mut self) -> Result<()> {
        self.handler().on_success()
    }

    fn on_failure(&mut self) -> Result<()> {
        self.handler().on_failure()
    }

    fn on_ignored(&mut self) -> Result<()> {
        self.handler().on_ignored()
    }
}
