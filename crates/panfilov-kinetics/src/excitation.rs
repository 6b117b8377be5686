//! Pass B: fast excitation kinetics.

use panfilov_grid::UpdateViews;
use rayon::prelude::*;

use crate::pass::{PassContext, UpdatePass};

/// Cubic excitation term, applied in place to the diffused field:
///
/// ```text
/// E -= dt * (kk * E * (E - a) * (E - 1) + E * R)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FastExcitation;

impl UpdatePass for FastExcitation {
    fn name(&self) -> &'static str {
        "excitation"
    }

    fn apply(&self, views: &mut UpdateViews<'_>, ctx: &PassContext) {
        let dt = ctx.disc.dt;
        let kk = ctx.params.kk;
        let a = ctx.params.a;
        let cols = views.next.cols();

        views
            .next
            .par_interior_rows_mut()
            .zip(views.recovery.par_interior_rows())
            .for_each(|(e_row, r_row)| {
                for col in 1..=cols {
                    let e = e_row[col];
                    e_row[col] = e - dt * (kk * e * (e - a) * (e - 1.0) + e * r_row[col]);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panfilov_core::{Discretization, ModelParams};
    use panfilov_grid::GridStore;

    #[test]
    fn fixed_points_do_not_move() {
        let params = ModelParams::default();
        let ctx = PassContext {
            params,
            disc: Discretization::new(&params, 3, 0.1),
        };
        let mut store = GridStore::new(1, 3).unwrap();
        store
            .update_views()
            .next
            .fill_interior(|_, c| [0.0, params.a, 1.0][c - 1]);
        FastExcitation.apply(&mut store.update_views(), &ctx);
        assert_eq!(store.excitation().interior_row(1), &[0.0, params.a, 1.0]);
    }

    #[test]
    fn sub_threshold_excitation_decays() {
        let params = ModelParams::default();
        let ctx = PassContext {
            params,
            disc: Discretization::new(&params, 2, 0.1),
        };
        let mut store = GridStore::new(2, 2).unwrap();
        store.update_views().next.fill_interior(|_, _| 0.05);
        store.recovery_mut().fill_interior(|_, _| 0.5);

        FastExcitation.apply(&mut store.update_views(), &ctx);

        for v in store.excitation().interior_to_vec() {
            assert!(v < 0.05 && v > 0.0, "{v}");
        }
    }
}
