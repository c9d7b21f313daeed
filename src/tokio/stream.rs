use tokio::sync::{mpsc, watch};

use crate::col::ColumnKeys;
use crate::error::{Error, Result};
use crate::protocol::ExchangeOutcome;
use crate::record::Record;

use super::Progress;

/// Consuming end of a [`super::ChannelMode`]
pub struct ResultStream {
    records: mpsc::UnboundedReceiver<Record>,
    progress: watch::Receiver<Progress>,
}

impl ResultStream {
    pub(super) fn new(
        records: mpsc::UnboundedReceiver<Record>,
        progress: watch::Receiver<Progress>,
    ) -> Self {
        Self { records, progress }
    }

    /// Column keys of the result
    ///
    /// Suspends until the fields metadata arrives or the exchange is processed.
    /// An exchange processed without fields has empty keys.
    pub async fn keys(&mut self) -> Result<ColumnKeys> {
        let progress = self
            .progress
            .wait_for(|p| p.keys.is_some() || p.outcome.is_some())
            .await
            .map_err(|_closed| Error::IncompleteExchange)?;
        Ok(progress.keys.clone().unwrap_or_default())
    }

    /// Next record, or `None` once the record stream is closed
    pub async fn next(&mut self) -> Option<Record> {
        self.records.recv().await
    }

    /// Terminal outcome of the exchange
    pub async fn outcome(&mut self) -> Result<ExchangeOutcome> {
        let progress = self
            .progress
            .wait_for(|p| p.outcome.is_some())
            .await
            .map_err(|_closed| Error::IncompleteExchange)?;
        progress.outcome.ok_or(Error::IncompleteExchange)
    }

    /// Receive every remaining record, then the outcome
    pub async fn collect(mut self) -> Result<(Vec<Record>, ExchangeOutcome)> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await {
            records.push(record);
        }
        let outcome = self.outcome().await?;
        Ok((records, outcome))
    }
}
