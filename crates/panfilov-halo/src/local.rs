//! Transport for a run with a single worker.

use panfilov_core::{ExchangeError, Rank};

use crate::transport::{Tag, Transport};

/// The one-worker transport: collectives are identities and there are
/// no peers to exchange with.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTransport;

impl Transport for LocalTransport {
    fn rank(&self) -> Rank {
        Rank::ROOT
    }

    fn size(&self) -> usize {
        1
    }

    fn exchange(
        &self,
        peer: Rank,
        _tag: Tag,
        _outgoing: &[f64],
        _incoming: &mut [f64],
    ) -> Result<(), ExchangeError> {
        Err(ExchangeError::UnknownPeer { peer, size: 1 })
    }

    fn barrier(&self) -> Result<(), ExchangeError> {
        Ok(())
    }

    fn gather(&self, payload: Vec<f64>) -> Result<Option<Vec<Vec<f64>>>, ExchangeError> {
        Ok(Some(vec![payload]))
    }

    fn all_reduce_sum(&self, value: f64) -> Result<f64, ExchangeError> {
        Ok(value)
    }

    fn all_reduce_max(&self, value: f64) -> Result<f64, ExchangeError> {
        Ok(value)
    }
}
