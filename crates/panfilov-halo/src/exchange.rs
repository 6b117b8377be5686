//! Per-step ghost-cell refresh: mirror, then rows, then columns.

use panfilov_core::{ExchangeError, Phase, Rank, Side, StepError};
use panfilov_grid::{Grid, Partition, WorkerPool};

use crate::mirror::mirror_edges;
use crate::transport::{Tag, Transport};

/// One shared boundary with a neighbouring worker.
#[derive(Debug)]
struct Link {
    side: Side,
    peer: Rank,
    /// Interior row or column sent to the peer.
    interior: usize,
    /// Ghost row or column filled from the peer.
    ghost: usize,
}

impl Link {
    /// `len` is the local interior extent along the link's axis.
    fn new(side: Side, peer: Rank, len: usize) -> Self {
        let (interior, ghost) = match side {
            Side::North | Side::West => (1, 0),
            Side::South | Side::East => (len, len + 1),
        };
        Self {
            side,
            peer,
            interior,
            ghost,
        }
    }
}

/// A column link with its pack buffers.
#[derive(Debug)]
struct ColumnLink {
    link: Link,
    send: Vec<f64>,
    recv: Vec<f64>,
}

/// Halo exchange state of one worker.
///
/// Holds the worker's links in exchange order and one pair of column
/// buffers per column link, allocated once for the worker's local row
/// count and reused every step.
#[derive(Debug)]
pub struct HaloExchange {
    rank: Rank,
    rows: Vec<Link>,
    columns: Vec<ColumnLink>,
}

impl HaloExchange {
    /// Prepare the exchange for `partition`.
    ///
    /// With `communicate == false` both neighbour phases are skipped and
    /// only the mirror runs; interior seams then behave like domain
    /// edges.
    pub fn new(partition: &Partition, communicate: bool) -> Self {
        let mut rows = Vec::new();
        let mut columns = Vec::new();
        if communicate {
            for (side, peer) in partition.neighbours.linked() {
                if side.is_row() {
                    rows.push(Link::new(side, peer, partition.rows));
                } else {
                    columns.push(ColumnLink {
                        link: Link::new(side, peer, partition.cols),
                        send: vec![0.0; partition.rows],
                        recv: vec![0.0; partition.rows],
                    });
                }
            }
        }
        Self {
            rank: partition.rank,
            rows,
            columns,
        }
    }

    /// Whether the row phase is active.
    pub fn exchanges_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Whether the column phase is active.
    pub fn exchanges_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Bring every ghost cell of `grid` up to date for step `niter`.
    ///
    /// Afterwards each ghost cell holds either the adjacent worker's
    /// current boundary interior value or, on the global edge, the
    /// mirrored interior value.
    pub fn refresh<T: Transport + ?Sized>(
        &mut self,
        grid: &mut Grid,
        transport: &T,
        pool: &WorkerPool,
        niter: u64,
    ) -> Result<(), StepError> {
        pool.install(|| mirror_edges(grid));

        if self.exchanges_rows() {
            self.exchange_rows(grid, transport)
                .map_err(|e| StepError::exchange(niter, Phase::RowExchange, e))?;
        }
        if self.exchanges_columns() {
            self.exchange_columns(grid, transport, pool)
                .map_err(|e| StepError::exchange(niter, Phase::ColumnExchange, e))?;
        }
        Ok(())
    }

    fn exchange_rows<T: Transport + ?Sized>(
        &self,
        grid: &mut Grid,
        transport: &T,
    ) -> Result<(), ExchangeError> {
        for link in &self.rows {
            let (send, recv) = grid.row_pair_mut(link.interior, link.ghost);
            transport.exchange(link.peer, Tag::Row, send, recv)?;
            tracing::trace!(
                rank = %self.rank,
                peer = %link.peer,
                side = %link.side,
                "row exchanged"
            );
        }
        Ok(())
    }

    fn exchange_columns<T: Transport + ?Sized>(
        &mut self,
        grid: &mut Grid,
        transport: &T,
        pool: &WorkerPool,
    ) -> Result<(), ExchangeError> {
        {
            let grid = &*grid;
            let columns = &mut self.columns;
            pool.install(|| {
                for column in columns.iter_mut() {
                    grid.pack_column(column.link.interior, &mut column.send);
                }
            });
        }

        for column in &mut self.columns {
            let link = &column.link;
            transport.exchange(link.peer, Tag::Column, &column.send, &mut column.recv)?;
            tracing::trace!(
                rank = %self.rank,
                peer = %link.peer,
                side = %link.side,
                "column exchanged"
            );
        }

        let columns = &self.columns;
        pool.install(|| {
            for column in columns {
                grid.unpack_column(column.link.ghost, &column.recv);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalTransport;
    use crate::mesh::ChannelMesh;
    use panfilov_grid::WorkerTopology;
    use std::thread;

    fn labelled(p: &Partition) -> Grid {
        let mut g = Grid::new(p.rows, p.cols).unwrap();
        g.fill_interior(|r, c| {
            let (gr, gc) = p.to_global(r, c);
            (gr * 100 + gc) as f64
        });
        g
    }

    #[test]
    fn single_worker_only_mirrors() {
        let p = Partition::new(4, WorkerTopology::single(), Rank(0));
        let mut halo = HaloExchange::new(&p, true);
        assert!(!halo.exchanges_rows());
        assert!(!halo.exchanges_columns());

        let pool = WorkerPool::new(1, 0).unwrap();
        let mut g = labelled(&p);
        halo.refresh(&mut g, &LocalTransport, &pool, 1).unwrap();
        assert_eq!(g.interior_row(0), g.interior_row(2));
        assert_eq!(g.get(2, 5), g.get(2, 3));
    }

    #[test]
    fn links_follow_exchange_order() {
        // Centre of a 3x3 worker grid over a 12x12 domain: 4x4 interior.
        let p = Partition::new(12, WorkerTopology::new(3, 3), Rank(4));
        let halo = HaloExchange::new(&p, true);

        let rows: Vec<_> = halo
            .rows
            .iter()
            .map(|l| (l.side, l.peer, l.interior, l.ghost))
            .collect();
        assert_eq!(
            rows,
            [(Side::South, Rank(7), 4, 5), (Side::North, Rank(1), 1, 0)]
        );
        let columns: Vec<_> = halo
            .columns
            .iter()
            .map(|c| (c.link.side, c.link.peer, c.link.interior, c.link.ghost, c.send.len()))
            .collect();
        assert_eq!(
            columns,
            [
                (Side::East, Rank(5), 4, 5, 4),
                (Side::West, Rank(3), 1, 0, 4)
            ]
        );

        let silent = HaloExchange::new(&p, false);
        assert!(!silent.exchanges_rows());
        assert!(!silent.exchanges_columns());
    }

    #[test]
    fn two_by_one_split_sees_neighbour_columns() {
        let n = 6;
        let topo = WorkerTopology::new(2, 1);
        let handles: Vec<_> = ChannelMesh::build(2, None)
            .into_iter()
            .map(|ep| {
                thread::spawn(move || {
                    let p = Partition::new(n, topo, ep.rank());
                    let pool = WorkerPool::new(1, p.rank.index()).unwrap();
                    let mut g = labelled(&p);
                    HaloExchange::new(&p, true)
                        .refresh(&mut g, &ep, &pool, 1)
                        .unwrap();
                    (p, g)
                })
            })
            .collect();
        let out: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let (left, lg) = &out[0];
        let (right, rg) = &out[1];
        for row in 1..=left.rows {
            // Left worker's east ghost = right worker's first column.
            assert_eq!(lg.get(row, left.cols + 1), rg.get(row, 1));
            assert_eq!(rg.get(row, 0), lg.get(row, left.cols));
            // Global edges stay mirrored.
            assert_eq!(lg.get(row, 0), lg.get(row, 2));
            assert_eq!(rg.get(row, right.cols + 1), rg.get(row, right.cols - 1));
        }
    }

    #[test]
    fn disabled_communication_leaves_mirror_on_seams() {
        let n = 6;
        let topo = WorkerTopology::new(1, 2);
        let p = Partition::new(n, topo, Rank(0));
        let mut halo = HaloExchange::new(&p, false);
        assert!(!halo.exchanges_rows());

        let pool = WorkerPool::new(1, 0).unwrap();
        let mut g = labelled(&p);
        // No peer is ever contacted, so a lone endpoint is enough.
        let eps = ChannelMesh::build(2, None);
        halo.refresh(&mut g, &eps[0], &pool, 1).unwrap();
        assert_eq!(g.interior_row(p.rows + 1), g.interior_row(p.rows - 1));
    }

    #[test]
    fn dead_neighbour_fails_with_phase() {
        let topo = WorkerTopology::new(1, 2);
        let p = Partition::new(6, topo, Rank(0));
        let mut eps = ChannelMesh::build(2, None);
        let mine = eps.remove(0);
        drop(eps);

        let pool = WorkerPool::new(1, 0).unwrap();
        let mut g = labelled(&p);
        let err = HaloExchange::new(&p, true)
            .refresh(&mut g, &mine, &pool, 7)
            .unwrap_err();
        let StepError::Exchange { niter, phase, .. } = err;
        assert_eq!(niter, 7);
        assert_eq!(phase, Phase::RowExchange);
    }
}
