use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    fmt::{Display, Formatter},
};

use crate::{error::TmapError, properties::Edge};

pub const DEFAULT_EDGE_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeOp {
    Insert,
    Update,
    Delete,
}

impl Display for EdgeOp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EdgeOp::Insert => write!(f, "insert"),
            EdgeOp::Update => write!(f, "update"),
            EdgeOp::Delete => write!(f, "delete"),
        }
    }
}

/// One edge store mutation. Edges are not tracked per document by the graphs, so these
/// entries are how a consumer learns *which* edge changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeChange {
    pub op: EdgeOp,
    pub edge: Edge,
    /// Namespace (title prefix) the edge document lives under.
    pub namespace: String,
}

impl Display for EdgeChange {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {} in {}", self.op, self.edge, self.namespace)
    }
}

/// Read position of one consumer within an [`EdgeChangeLog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cursor(u64);

impl Cursor {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Bounded, versioned log of edge store mutations.
///
/// Every entry gets a monotone sequence number. Consumers hold a [`Cursor`] and read what
/// was appended since; once the log exceeds its capacity the oldest entries are dropped, and
/// a consumer whose cursor points before the retained window gets [`TmapError::Lagged`]
/// instead of a partial history.
#[derive(Debug, Clone)]
pub struct EdgeChangeLog {
    entries: VecDeque<(u64, EdgeChange)>,
    capacity: usize,
    next_seq: u64,
}

impl Default for EdgeChangeLog {
    fn default() -> Self {
        EdgeChangeLog::with_capacity(DEFAULT_EDGE_LOG_CAPACITY)
    }
}

impl EdgeChangeLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        EdgeChangeLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking drops the oldest entries immediately.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    pub fn push(&mut self, change: EdgeChange) -> Cursor {
        tracing::debug!("[EdgeChangeLog] #{} {}", self.next_seq, change);
        self.entries.push_back((self.next_seq, change));
        self.next_seq += 1;
        self.trim();
        Cursor(self.next_seq)
    }

    fn trim(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Cursor positioned after the newest entry.
    pub fn head(&self) -> Cursor {
        Cursor(self.next_seq)
    }

    fn oldest_seq(&self) -> u64 {
        self.entries
            .front()
            .map(|(seq, _)| *seq)
            .unwrap_or(self.next_seq)
    }

    /// Entries appended since `cursor`, oldest first. Does not move the cursor.
    pub fn since(&self, cursor: Cursor) -> Result<Vec<&EdgeChange>, TmapError> {
        let oldest = self.oldest_seq();
        if cursor.0 < oldest {
            return Err(TmapError::Lagged(oldest - cursor.0));
        }
        Ok(self
            .entries
            .iter()
            .skip_while(|(seq, _)| *seq < cursor.0)
            .map(|(_, change)| change)
            .collect())
    }

    /// Read everything since `cursor` and advance it to the head. A lagged cursor is still
    /// advanced, so the consumer resynchronizes once it has rebuilt.
    pub fn read(&self, cursor: &mut Cursor) -> Result<Vec<EdgeChange>, TmapError> {
        let result = self
            .since(*cursor)
            .map(|changes| changes.into_iter().cloned().collect());
        *cursor = self.head();
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
