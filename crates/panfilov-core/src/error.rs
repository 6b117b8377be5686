//! Error types shared by the exchange and stepping layers.
//!
//! Configuration and allocation errors live next to the code that
//! detects them (`panfilov-engine` and `panfilov-grid`); this module
//! holds the errors that cross crate boundaries at run time.

use std::error::Error;
use std::fmt;

use crate::id::Rank;

/// Failures of the inter-worker message layer.
///
/// The exchange protocol assumes a reliable, in-order, lossless
/// transport. These errors report the ways that assumption can be
/// observed to break; none of them is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// The peer's endpoint was dropped (the worker exited or panicked).
    PeerDisconnected {
        /// The peer that went away.
        peer: Rank,
    },
    /// No message from the peer arrived within the configured timeout.
    Timeout {
        /// The peer being waited on.
        peer: Rank,
        /// How long the receive waited, in milliseconds.
        waited_ms: u64,
    },
    /// A message arrived that does not belong to the current protocol
    /// phase.
    ProtocolViolation {
        /// The sending peer.
        peer: Rank,
        /// What was expected and what arrived.
        reason: String,
    },
    /// A message payload had the wrong number of values.
    LengthMismatch {
        /// The sending peer.
        peer: Rank,
        /// Number of values the receiver expected.
        expected: usize,
        /// Number of values that arrived.
        got: usize,
    },
    /// The requested peer is not part of this transport.
    UnknownPeer {
        /// The requested peer.
        peer: Rank,
        /// Number of workers on the transport.
        size: usize,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerDisconnected { peer } => write!(f, "peer {peer} disconnected"),
            Self::Timeout { peer, waited_ms } => {
                write!(f, "timed out after {waited_ms} ms waiting for peer {peer}")
            }
            Self::ProtocolViolation { peer, reason } => {
                write!(f, "protocol violation from peer {peer}: {reason}")
            }
            Self::LengthMismatch {
                peer,
                expected,
                got,
            } => write!(
                f,
                "payload from peer {peer} has {got} values, expected {expected}"
            ),
            Self::UnknownPeer { peer, size } => {
                write!(f, "peer {peer} is outside a transport of {size} workers")
            }
        }
    }
}

impl Error for ExchangeError {}

/// A model constant that cannot be integrated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamError {
    /// The constant is NaN or infinite.
    NonFinite {
        /// Field name in [`ModelParams`](crate::ModelParams).
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The diffusion coefficient is negative.
    NegativeDiffusion {
        /// The offending value of `d`.
        value: f64,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { name, value } => write!(f, "{name} must be finite, got {value}"),
            Self::NegativeDiffusion { value } => write!(f, "d must be >= 0, got {value}"),
        }
    }
}

impl Error for ParamError {}

/// The part of a timestep during which a failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// North/south ghost row exchange.
    RowExchange,
    /// East/west ghost column exchange.
    ColumnExchange,
    /// End-of-step rendezvous.
    Barrier,
    /// Collecting interiors on the coordinating worker.
    Gather,
    /// Global reduction of field statistics.
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RowExchange => "row exchange",
            Self::ColumnExchange => "column exchange",
            Self::Barrier => "barrier",
            Self::Gather => "gather",
            Self::Reduce => "reduce",
        };
        f.write_str(name)
    }
}

/// Errors from advancing a worker by one timestep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// Communication with a peer failed.
    Exchange {
        /// Step counter at the time of failure.
        niter: u64,
        /// The phase that failed.
        phase: Phase,
        /// The underlying transport error.
        source: ExchangeError,
    },
}

impl StepError {
    /// Wrap an exchange failure with its step and phase.
    pub fn exchange(niter: u64, phase: Phase, source: ExchangeError) -> Self {
        Self::Exchange {
            niter,
            phase,
            source,
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exchange {
                niter,
                phase,
                source,
            } => write!(f, "step {niter}: {phase} failed: {source}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exchange { source, .. } => Some(source),
        }
    }
}
