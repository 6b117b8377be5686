//! In-process transport: a full mesh of per-pair channels.
//!
//! Each ordered pair of ranks `(from, to)` owns one unbounded crossbeam
//! channel, so messages between two workers arrive in send order and a
//! send never blocks. Collectives are routed through [`Rank::ROOT`].
//!
//! When a worker's [`MeshEndpoint`] is dropped (the worker returned or
//! panicked), every peer blocked on it observes
//! [`ExchangeError::PeerDisconnected`] instead of hanging.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use panfilov_core::{ExchangeError, Rank};

use crate::transport::{Tag, Transport};

#[derive(Debug)]
struct Message {
    tag: Tag,
    payload: Vec<f64>,
}

/// Builder for a set of connected [`MeshEndpoint`]s.
#[derive(Debug)]
pub struct ChannelMesh;

impl ChannelMesh {
    /// Create `size` endpoints, one per rank, in rank order.
    ///
    /// With `recv_timeout` set, any receive that waits longer fails with
    /// [`ExchangeError::Timeout`].
    pub fn build(size: usize, recv_timeout: Option<Duration>) -> Vec<MeshEndpoint> {
        let mut senders: Vec<Vec<Option<Sender<Message>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        let mut receivers: Vec<Vec<Option<Receiver<Message>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

        for from in 0..size {
            for to in 0..size {
                if from == to {
                    continue;
                }
                let (tx, rx) = crossbeam_channel::unbounded();
                senders[from][to] = Some(tx);
                receivers[to][from] = Some(rx);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (outbox, inbox))| MeshEndpoint {
                rank: Rank(rank),
                outbox,
                inbox,
                recv_timeout,
            })
            .collect()
    }
}

/// One worker's view of a [`ChannelMesh`].
#[derive(Debug)]
pub struct MeshEndpoint {
    rank: Rank,
    outbox: Vec<Option<Sender<Message>>>,
    inbox: Vec<Option<Receiver<Message>>>,
    recv_timeout: Option<Duration>,
}

impl MeshEndpoint {
    fn check_peer(&self, peer: Rank) -> Result<usize, ExchangeError> {
        let i = peer.index();
        if i >= self.outbox.len() || peer == self.rank {
            return Err(ExchangeError::UnknownPeer {
                peer,
                size: self.outbox.len(),
            });
        }
        Ok(i)
    }

    fn send(&self, peer: Rank, tag: Tag, payload: Vec<f64>) -> Result<(), ExchangeError> {
        let i = self.check_peer(peer)?;
        let tx = self.outbox[i]
            .as_ref()
            .ok_or(ExchangeError::UnknownPeer {
                peer,
                size: self.outbox.len(),
            })?;
        tx.send(Message { tag, payload })
            .map_err(|_| ExchangeError::PeerDisconnected { peer })
    }

    fn recv(&self, peer: Rank, tag: Tag) -> Result<Vec<f64>, ExchangeError> {
        let i = self.check_peer(peer)?;
        let rx = self.inbox[i].as_ref().ok_or(ExchangeError::UnknownPeer {
            peer,
            size: self.inbox.len(),
        })?;
        let msg = match self.recv_timeout {
            Some(limit) => rx.recv_timeout(limit).map_err(|e| match e {
                RecvTimeoutError::Timeout => ExchangeError::Timeout {
                    peer,
                    waited_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                },
                RecvTimeoutError::Disconnected => ExchangeError::PeerDisconnected { peer },
            })?,
            None => rx
                .recv()
                .map_err(|_| ExchangeError::PeerDisconnected { peer })?,
        };
        if msg.tag != tag {
            return Err(ExchangeError::ProtocolViolation {
                peer,
                reason: format!("expected {tag} message, got {}", msg.tag),
            });
        }
        Ok(msg.payload)
    }

    fn peers(&self) -> impl Iterator<Item = Rank> + '_ {
        (0..self.outbox.len())
            .map(Rank)
            .filter(move |&r| r != self.rank)
    }

    fn recv_scalar(&self, peer: Rank, tag: Tag) -> Result<f64, ExchangeError> {
        let payload = self.recv(peer, tag)?;
        match payload.as_slice() {
            [v] => Ok(*v),
            _ => Err(ExchangeError::LengthMismatch {
                peer,
                expected: 1,
                got: payload.len(),
            }),
        }
    }

    /// Combine one value per rank on the root in rank order, then
    /// broadcast the result.
    fn all_reduce(&self, value: f64, op: fn(f64, f64) -> f64) -> Result<f64, ExchangeError> {
        if self.rank.is_root() {
            let mut acc = value;
            for peer in self.peers() {
                acc = op(acc, self.recv_scalar(peer, Tag::Reduce)?);
            }
            for peer in self.peers() {
                self.send(peer, Tag::Reduce, vec![acc])?;
            }
            Ok(acc)
        } else {
            self.send(Rank::ROOT, Tag::Reduce, vec![value])?;
            self.recv_scalar(Rank::ROOT, Tag::Reduce)
        }
    }
}

impl Transport for MeshEndpoint {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.outbox.len()
    }

    fn exchange(
        &self,
        peer: Rank,
        tag: Tag,
        outgoing: &[f64],
        incoming: &mut [f64],
    ) -> Result<(), ExchangeError> {
        self.send(peer, tag, outgoing.to_vec())?;
        let payload = self.recv(peer, tag)?;
        if payload.len() != incoming.len() {
            return Err(ExchangeError::LengthMismatch {
                peer,
                expected: incoming.len(),
                got: payload.len(),
            });
        }
        incoming.copy_from_slice(&payload);
        Ok(())
    }

    fn barrier(&self) -> Result<(), ExchangeError> {
        if self.rank.is_root() {
            for peer in self.peers() {
                self.recv(peer, Tag::Barrier)?;
            }
            for peer in self.peers() {
                self.send(peer, Tag::Barrier, Vec::new())?;
            }
        } else {
            self.send(Rank::ROOT, Tag::Barrier, Vec::new())?;
            self.recv(Rank::ROOT, Tag::Barrier)?;
        }
        Ok(())
    }

    fn gather(&self, payload: Vec<f64>) -> Result<Option<Vec<Vec<f64>>>, ExchangeError> {
        if !self.rank.is_root() {
            self.send(Rank::ROOT, Tag::Gather, payload)?;
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.size());
        parts.push(payload);
        for peer in self.peers() {
            parts.push(self.recv(peer, Tag::Gather)?);
        }
        Ok(Some(parts))
    }

    fn all_reduce_sum(&self, value: f64) -> Result<f64, ExchangeError> {
        self.all_reduce(value, |a, b| a + b)
    }

    fn all_reduce_max(&self, value: f64) -> Result<f64, ExchangeError> {
        self.all_reduce(value, f64::max)
    }
}
