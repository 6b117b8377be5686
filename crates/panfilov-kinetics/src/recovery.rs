//! Pass C: slow recovery kinetics.

use panfilov_grid::UpdateViews;
use rayon::prelude::*;

use crate::pass::{PassContext, UpdatePass};

/// Recovery-variable update, reading the excitation produced by
/// [`FastExcitation`](crate::FastExcitation):
///
/// ```text
/// R += dt * (epsilon + M1 * R / (E + M2)) * (-R - kk * E * (E - b - 1))
/// ```
///
/// There is no guard on the denominator. When `E + M2 == 0` the quotient
/// follows IEEE 754 (an infinity, or NaN for `R == 0`) and propagates
/// into the field.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recovery;

impl UpdatePass for Recovery {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn apply(&self, views: &mut UpdateViews<'_>, ctx: &PassContext) {
        let dt = ctx.disc.dt;
        let p = ctx.params;
        let cols = views.recovery.cols();

        views
            .recovery
            .par_interior_rows_mut()
            .zip(views.next.par_interior_rows())
            .for_each(|(r_row, e_row)| {
                for col in 1..=cols {
                    let e = e_row[col];
                    let r = r_row[col];
                    r_row[col] = r
                        + dt * (p.epsilon + p.m1 * r / (e + p.m2))
                            * (-r - p.kk * e * (e - p.b - 1.0));
                }
            });
    }
}
