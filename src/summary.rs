use auto_impl::auto_impl;

use crate::value::{Metadata, Value};

/// The statement an exchange runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub text: String,
    pub parameters: Metadata,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Metadata::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// The server that answers an exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub address: String,
    pub version: Option<String>,
}

/// Receives the metadata a result collector forwards
///
/// Fields metadata arrives through `collect_with_fields`, completion metadata through `collect`.
#[auto_impl(&mut, Box)]
pub trait SummaryAggregator {
    fn collect_with_fields(&mut self, meta: &Metadata);
    fn collect(&mut self, meta: &Metadata);
}

/// Keeps forwarded metadata verbatim alongside the statement and server it belongs to
#[derive(Debug, Clone, Default)]
pub struct SummaryCollector {
    statement: Statement,
    server: ServerInfo,
    fields_meta: Metadata,
    summary_meta: Metadata,
}

impl SummaryCollector {
    pub fn new(statement: Statement, server: ServerInfo) -> Self {
        Self {
            statement,
            server,
            fields_meta: Metadata::new(),
            summary_meta: Metadata::new(),
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn server(&self) -> &ServerInfo {
        &self.server
    }

    /// Look up a forwarded entry, completion metadata first
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.summary_meta
            .get(key)
            .or_else(|| self.fields_meta.get(key))
    }

    pub fn fields_metadata(&self) -> &Metadata {
        &self.fields_meta
    }

    pub fn summary_metadata(&self) -> &Metadata {
        &self.summary_meta
    }
}

impl SummaryAggregator for SummaryCollector {
    fn collect_with_fields(&mut self, meta: &Metadata) {
        self.fields_meta
            .extend(meta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn collect(&mut self, meta: &Metadata) {
        self.summary_meta
            .extend(meta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
