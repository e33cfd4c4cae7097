//! Order data sources.
//!
//! A source produces the whole collection in one call. The document shape is
//! `{"orders": [ {id, user, project, address, date, status}, ... ]}`; a
//! document whose `orders` key is missing or `null` is an empty collection.
//!
//! Records are validated one at a time. A record with a missing field, an
//! unknown status, an unparsable date or a duplicate id is skipped with a
//! warning; only a document that is not a JSON object fails the load.

use crate::metrics::RECORDS_REJECTED;
use crate::types::{Order, OrderId, OrderStatus, UnknownLabel};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::RwLock;

/// Fixture compiled into the binary
const BUNDLED_ORDERS: &str = include_str!("../data/orders.json");

/// Errors that fail a whole load
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the document failed
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document is not a JSON object of the expected shape
    #[error("malformed orders document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source reported a failure of its own
    #[error("order source failed: {0}")]
    Source(String),
}

/// Why a single record was skipped
#[derive(Error, Debug)]
pub enum RecordError {
    /// Missing or mistyped field
    #[error("invalid record: {0}")]
    Shape(#[from] serde_json::Error),

    /// Status outside the known set
    #[error(transparent)]
    Status(#[from] UnknownLabel),

    /// Date is neither `YYYY-MM-DD` nor RFC 3339
    #[error("invalid date `{0}`")]
    Date(String),

    /// Id already seen earlier in the document
    #[error("duplicate order id `{0}`")]
    DuplicateId(OrderId),
}

/// Asynchronous provider of the order collection
///
/// Object safe so an environment can hold `Arc<dyn OrderSource>`.
pub trait OrderSource: Send + Sync {
    /// Load the full collection
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the collection cannot be produced at all.
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Order>, LoadError>> + Send + '_>>;

    /// Short name for logs
    fn name(&self) -> &str;
}

#[derive(Deserialize)]
struct OrdersDocument {
    #[serde(default)]
    orders: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct OrderRecord {
    id: String,
    user: String,
    project: String,
    address: String,
    date: String,
    status: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .map_err(|_| RecordError::Date(raw.to_string()))
}

fn parse_record(value: serde_json::Value) -> Result<Order, RecordError> {
    let record: OrderRecord = serde_json::from_value(value)?;
    Ok(Order {
        id: OrderId::new(record.id),
        user: record.user,
        project: record.project,
        address: record.address,
        date: parse_date(&record.date)?,
        status: record.status.parse::<OrderStatus>()?,
    })
}

/// Parse an orders document, skipping invalid records
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if `text` is not an object with an optional
/// (possibly `null`) `orders` array.
pub fn parse_orders(text: &str) -> Result<Vec<Order>, LoadError> {
    let document: OrdersDocument = serde_json::from_str(text)?;
    let records = document.orders.unwrap_or_default();
    let mut seen = HashSet::new();
    let mut orders = Vec::with_capacity(records.len());

    for (index, value) in records.into_iter().enumerate() {
        let parsed = parse_record(value).and_then(|order| {
            if seen.insert(order.id.clone()) {
                Ok(order)
            } else {
                Err(RecordError::DuplicateId(order.id))
            }
        });

        match parsed {
            Ok(order) => orders.push(order),
            Err(error) => {
                tracing::warn!(index, %error, "Skipping order record");
                metrics::counter!(RECORDS_REJECTED).increment(1);
            },
        }
    }

    Ok(orders)
}

/// The fixture shipped with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledOrderSource;

impl OrderSource for BundledOrderSource {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Order>, LoadError>> + Send + '_>> {
        Box::pin(async { parse_orders(BUNDLED_ORDERS) })
    }

    fn name(&self) -> &str {
        "bundled"
    }
}

/// Orders read from a JSON file on every load
#[derive(Debug, Clone)]
pub struct JsonFileOrderSource {
    path: PathBuf,
}

impl JsonFileOrderSource {
    /// Read orders from `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file being read
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSource for JsonFileOrderSource {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Order>, LoadError>> + Send + '_>> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| LoadError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            parse_orders(&text)
        })
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Orders held in memory, replaceable at runtime
///
/// Can be switched into a failing mode to exercise the error path.
#[derive(Debug)]
pub struct InMemoryOrderSource {
    outcome: RwLock<Result<Vec<Order>, String>>,
}

impl InMemoryOrderSource {
    /// Serve `orders` on every load
    #[must_use]
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            outcome: RwLock::new(Ok(orders)),
        }
    }

    /// Fail every load with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: RwLock::new(Err(message.into())),
        }
    }

    /// Serve `orders` from now on
    pub async fn replace(&self, orders: Vec<Order>) {
        *self.outcome.write().await = Ok(orders);
    }

    /// Fail with `message` from now on
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.outcome.write().await = Err(message.into());
    }
}

impl OrderSource for InMemoryOrderSource {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Order>, LoadError>> + Send + '_>> {
        Box::pin(async move { self.outcome.read().await.clone().map_err(LoadError::Source) })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
