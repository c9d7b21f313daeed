pub mod r#trait;

use std::fmt;

use crate::error::Result;
use crate::value::{Metadata, Value};

pub use r#trait::{ConsumptionMode, EventSource, ResponseHandler};

/// Terminal disposition of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Success,
    Failure,
    Ignored,
}

impl fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangeOutcome::Success => "SUCCESS",
            ExchangeOutcome::Failure => "FAILURE",
            ExchangeOutcome::Ignored => "IGNORED",
        };
        f.write_str(name)
    }
}

/// One already-decoded response message of an exchange
///
/// The decoder produces them in protocol order:
/// `Fields? Record* Summary? (Success | Failure | Ignored)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Fields(Option<Metadata>),
    Record(Vec<Value>),
    Summary(Option<Metadata>),
    Bookmark(Metadata),
    Success,
    Failure,
    Ignored,
}

impl Event {
    /// Route this event to the matching callback of `handler`
    pub fn dispatch<H: ResponseHandler + ?Sized>(self, handler: &mut H) -> Result<()> {
        match self {
            Event::Fields(meta) => handler.on_fields(meta.as_ref()),
            Event::Record(values) => handler.on_record(values),
            Event::Summary(meta) => handler.on_summary(meta.as_ref()),
            Event::Bookmark(meta) => handler.on_bookmark(&meta),
            Event::Success => handler.on_success(),
            Event::Failure => handler.on_failure(),
            Event::Ignored => handler.on_ignored(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Success | Event::Failure | Event::Ignored)
    }
}
