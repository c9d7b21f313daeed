//! Streaming consumption across tasks.
//!
//! The decoding task owns a [`ResultCollector`](crate::collector::ResultCollector) over a
//! [`ChannelMode`] and feeds it events. The consuming task holds the matching [`ResultStream`]
//! and awaits keys, records and the outcome.

mod stream;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::col::ColumnKeys;
use crate::collector::Exchange;
use crate::error::{Error, Result};
use crate::protocol::{ConsumptionMode, ExchangeOutcome};
use crate::record::Record;
use crate::summary::SummaryAggregator;

pub use stream::ResultStream;

/// What the consuming side may observe without receiving records
#[derive(Debug, Clone, Default)]
struct Progress {
    keys: Option<ColumnKeys>,
    outcome: Option<ExchangeOutcome>,
}

/// Create a connected mode/stream pair for one exchange
pub fn channel() -> (ChannelMode, ResultStream) {
    let (records_tx, records_rx) = mpsc::unbounded_channel();
    let (progress_tx, progress_rx) = watch::channel(Progress::default());
    let mode = ChannelMode {
        records: Some(records_tx),
        progress: progress_tx,
    };
    (mode, ResultStream::new(records_rx, progress_rx))
}

/// Forwards records to a [`ResultStream`] as they arrive
#[derive(Debug)]
pub struct ChannelMode {
    records: Option<mpsc::UnboundedSender<Record>>,
    progress: watch::Sender<Progress>,
}

impl ConsumptionMode for ChannelMode {
    fn ensure_keys_resolved<S: SummaryAggregator>(
        &mut self,
        exchange: &mut Exchange<S>,
    ) -> Result<()> {
        if exchange.keys_known() || exchange.is_processed() {
            return Ok(());
        }
        Err(Error::BadUsageError(
            "keys are not known yet; await ResultStream::keys from the consuming task".to_string(),
        ))
    }

    fn no_more_records(&mut self) {
        if self.records.take().is_some() {
            trace!("record channel closed");
        }
    }

    fn accept_record(&mut self, record: Record) -> Result<()> {
        let Some(records) = &self.records else {
            return Err(Error::RecordStreamClosed);
        };
        if records.send(record).is_err() {
            debug!("result stream dropped, discarding record");
        }
        Ok(())
    }

    fn keys_received(&mut self, keys: &ColumnKeys) {
        self.progress.send_modify(|progress| {
            progress.keys = Some(keys.clone());
        });
    }

    fn exchange_processed(&mut self, keys: &ColumnKeys, outcome: ExchangeOutcome) {
        self.records = None;
        self.progress.send_modify(|progress| {
            progress.keys.get_or_insert_with(|| keys.clone());
            progress.outcome = Some(outcome);
        });
    }
}
