//! The message-passing seam between workers.

use std::fmt;

use panfilov_core::{ExchangeError, Rank};

/// Kind of a message on the wire.
///
/// Every receive states the tag it expects; a mismatch is reported as
/// [`ExchangeError::ProtocolViolation`] rather than silently consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Ghost row payload (north/south neighbours).
    Row,
    /// Ghost column payload (west/east neighbours).
    Column,
    /// Barrier arrival or release.
    Barrier,
    /// Interior payload sent to the root for gathering.
    Gather,
    /// Partial or final reduction value.
    Reduce,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Barrier => "barrier",
            Self::Gather => "gather",
            Self::Reduce => "reduce",
        };
        f.write_str(name)
    }
}

/// Point-to-point and collective operations over a fixed set of workers.
///
/// Implementations must deliver messages between any ordered pair of
/// ranks reliably and in order. Collectives must be entered by every
/// rank, in the same order.
pub trait Transport: Send {
    /// This worker's rank.
    fn rank(&self) -> Rank;

    /// Number of workers on the transport.
    fn size(&self) -> usize;

    /// Send `outgoing` to `peer` and receive exactly `incoming.len()`
    /// values from it.
    ///
    /// Both sides of a pair call `exchange` with the same `tag`; the
    /// send never waits for the matching receive.
    fn exchange(
        &self,
        peer: Rank,
        tag: Tag,
        outgoing: &[f64],
        incoming: &mut [f64],
    ) -> Result<(), ExchangeError>;

    /// Block until every worker has entered the barrier.
    fn barrier(&self) -> Result<(), ExchangeError>;

    /// Collect one payload per worker on [`Rank::ROOT`].
    ///
    /// The root gets `Some(parts)` with `parts[r]` from rank `r`; every
    /// other rank gets `None`.
    fn gather(&self, payload: Vec<f64>) -> Result<Option<Vec<Vec<f64>>>, ExchangeError>;

    /// Sum of `value` over all workers, returned on every worker.
    fn all_reduce_sum(&self, value: f64) -> Result<f64, ExchangeError>;

    /// Maximum of `value` over all workers, returned on every worker.
    fn all_reduce_max(&self, value: f64) -> Result<f64, ExchangeError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn exchange(
        &self,
        peer: Rank,
        tag: Tag,
        outgoing: &[f64],
        incoming: &mut [f64],
    ) -> Result<(), ExchangeError> {
        (**self).exchange(peer, tag, outgoing, incoming)
    }

    fn barrier(&self) -> Result<(), ExchangeError> {
        (**self).barrier()
    }

    fn gather(&self, payload: Vec<f64>) -> Result<Option<Vec<Vec<f64>>>, ExchangeError> {
        (**self).gather(payload)
    }

    fn all_reduce_sum(&self, value: f64) -> Result<f64, ExchangeError> {
        (**self).all_reduce_sum(value)
    }

    fn all_reduce_max(&self, value: f64) -> Result<f64, ExchangeError> {
        (**self).all_reduce_max(value)
    }
}
