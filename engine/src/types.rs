//! Core domain types for the order list.
//!
//! Orders are immutable records supplied by an [`OrderSource`](crate::source::OrderSource).
//! The filter vocabularies (`StatusFilter`, `DateFilter`) parse from and print
//! as the exact labels the dashboard's dropdowns use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique, human-readable identifier for an order (e.g. `ORD001`)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new `OrderId` from a string
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Error returned when a label does not name a known status or filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownLabel {
    /// What was being parsed ("status", "status filter", "date filter")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// Fulfilment status of an order
///
/// Labels are case-sensitive: `"completed"` is not a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order has been fulfilled
    Completed,
    /// Order is being worked on
    #[serde(rename = "In Progress")]
    InProgress,
    /// Order has not been started
    Pending,
    /// Order was cancelled
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in dropdown order
    pub const ALL: [Self; 4] = [
        Self::Completed,
        Self::InProgress,
        Self::Pending,
        Self::Cancelled,
    ];

    /// The display label, exactly as stored in the data
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS class list for the status badge, e.g. `status-badge in-progress`
    ///
    /// The label is lowercased and its first space becomes a hyphen.
    #[must_use]
    pub fn badge_class(self) -> String {
        format!(
            "status-badge {}",
            self.label().to_lowercase().replacen(' ', "-", 1)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// A single order as shown in the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,
    /// Customer name
    pub user: String,
    /// Project the order belongs to
    pub project: String,
    /// Delivery address
    pub address: String,
    /// Calendar date the order was placed
    pub date: NaiveDate,
    /// Current status
    pub status: OrderStatus,
}

impl Order {
    /// Case-insensitive substring search over id, user and project
    ///
    /// An empty term matches every order. A hit in any one field is enough.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        [self.id.as_str(), &self.user, &self.project]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Status dropdown value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    /// No status restriction
    #[default]
    All,
    /// Only orders with exactly this status
    Only(OrderStatus),
}

impl StatusFilter {
    /// Whether an order with `status` passes this filter
    #[must_use]
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        Self::Only(status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(Self::All);
        }
        s.parse::<OrderStatus>()
            .map(Self::Only)
            .map_err(|_| UnknownLabel {
                kind: "status filter",
                value: s.to_string(),
            })
    }
}

/// Date dropdown value, relative to today's calendar date
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFilter {
    /// No date restriction
    #[default]
    All,
    /// Placed today
    Today,
    /// Placed in the current Sunday-to-Saturday week
    #[serde(rename = "This Week")]
    ThisWeek,
    /// Placed in the current calendar month
    #[serde(rename = "This Month")]
    ThisMonth,
}

impl DateFilter {
    /// The dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateFilter {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::All, Self::Today, Self::ThisWeek, Self::ThisMonth]
            .into_iter()
            .find(|filter| filter.label() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "date filter",
                value: s.to_string(),
            })
    }
}
