//! Pass A: explicit 5-point diffusion.

use panfilov_grid::UpdateViews;
use rayon::prelude::*;

use crate::pass::{PassContext, UpdatePass};

/// Explicit-Euler diffusion on the 5-point stencil:
///
/// ```text
/// E[i] = E_prev[i] + alpha * (E_prev[east] + E_prev[west] - 4 E_prev[i]
///                             + E_prev[south] + E_prev[north])
/// ```
///
/// Reads `E_prev` including its ghost cells, which must have been
/// refreshed for this step.
#[derive(Clone, Copy, Debug, Default)]
pub struct Diffusion;

impl UpdatePass for Diffusion {
    fn name(&self) -> &'static str {
        "diffusion"
    }

    fn apply(&self, views: &mut UpdateViews<'_>, ctx: &PassContext) {
        let alpha = ctx.disc.alpha;
        let prev = views.prev;
        let stride = prev.stride();
        let cols = prev.cols();
        let src = prev.as_slice();

        views
            .next
            .par_interior_rows_mut()
            .enumerate()
            .for_each(|(j, out)| {
                let row = j + 1;
                let north = &src[(row - 1) * stride..row * stride];
                let mid = &src[row * stride..(row + 1) * stride];
                let south = &src[(row + 1) * stride..(row + 2) * stride];
                for col in 1..=cols {
                    let c = mid[col];
                    out[col] = c + alpha
                        * (mid[col + 1] + mid[col - 1] - 4.0 * c + south[col] + north[col]);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panfilov_core::{Discretization, ModelParams};
    use panfilov_grid::GridStore;

    fn ctx(n: usize) -> PassContext {
        let params = ModelParams::default();
        PassContext {
            params,
            disc: Discretization::new(&params, n, 0.1),
        }
    }

    #[test]
    fn point_source_spreads_to_four_neighbours() {
        let mut store = GridStore::new(5, 5).unwrap();
        store.excitation_prev_mut().set(3, 3, 1.0);
        let ctx = ctx(5);
        let alpha = ctx.disc.alpha;

        Diffusion.apply(&mut store.update_views(), &ctx);

        let next = store.excitation();
        assert_eq!(next.get(3, 3), 1.0 + alpha * (-4.0));
        for (r, c) in [(2, 3), (4, 3), (3, 2), (3, 4)] {
            assert_eq!(next.get(r, c), alpha);
        }
        assert_eq!(next.get(1, 1), 0.0);
        assert_eq!(next.get(2, 2), 0.0);
    }

    #[test]
    fn ghost_cells_feed_edge_cells() {
        let mut store = GridStore::new(2, 2).unwrap();
        store.excitation_prev_mut().set(0, 1, 1.0);
        let ctx = ctx(2);

        Diffusion.apply(&mut store.update_views(), &ctx);

        assert_eq!(store.excitation().get(1, 1), ctx.disc.alpha);
        assert_eq!(store.excitation().get(0, 1), 0.0, "ghosts are never written");
    }
}
