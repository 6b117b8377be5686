//! The ordered A → B → C update pipeline.

use panfilov_core::{Discretization, ModelParams};
use panfilov_grid::{UpdateViews, WorkerPool};

use crate::diffusion::Diffusion;
use crate::excitation::FastExcitation;
use crate::pass::{PassContext, UpdatePass};
use crate::recovery::Recovery;

/// The three update passes of one timestep, with the constants they
/// share.
///
/// # Examples
///
/// ```
/// use panfilov_core::{Discretization, ModelParams};
/// use panfilov_grid::{GridStore, WorkerPool};
/// use panfilov_kinetics::Kinetics;
///
/// let params = ModelParams::default();
/// let kinetics = Kinetics::new(params, Discretization::new(&params, 4, 0.1));
/// let pool = WorkerPool::new(1, 0).unwrap();
/// let mut store = GridStore::new(4, 4).unwrap();
///
/// kinetics.advance(&mut store.update_views(), &pool);
/// assert!(store.excitation().interior_to_vec().iter().all(|&v| v == 0.0));
/// ```
#[derive(Debug)]
pub struct Kinetics {
    ctx: PassContext,
    passes: Vec<Box<dyn UpdatePass>>,
}

impl Kinetics {
    /// Diffusion, fast excitation and recovery, in that order.
    pub fn new(params: ModelParams, disc: Discretization) -> Self {
        Self {
            ctx: PassContext { params, disc },
            passes: vec![
                Box::new(Diffusion),
                Box::new(FastExcitation),
                Box::new(Recovery),
            ],
        }
    }

    /// The shared constants.
    pub fn context(&self) -> &PassContext {
        &self.ctx
    }

    /// Pass names in execution order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass over `views` on `pool`.
    ///
    /// `views.prev` must already carry this step's ghost cells.
    pub fn advance(&self, views: &mut UpdateViews<'_>, pool: &WorkerPool) {
        pool.install(|| {
            for pass in &self.passes {
                pass.apply(views, &self.ctx);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panfilov_grid::GridStore;

    #[test]
    fn passes_run_in_model_order() {
        let params = ModelParams::default();
        let k = Kinetics::new(params, Discretization::new(&params, 8, 0.1));
        assert_eq!(k.pass_names(), vec!["diffusion", "excitation", "recovery"]);
        assert_eq!(k.context().disc.dt, 0.1);
    }

    #[test]
    fn recovery_sees_post_excitation_field() {
        // With R = 0 and a uniform field, diffusion is the identity, so
        // R after one step is a function of the excited E alone.
        let params = ModelParams::default();
        let disc = Discretization::new(&params, 2, 0.1);
        let k = Kinetics::new(params, disc);
        let pool = WorkerPool::new(2, 0).unwrap();
        let mut store = GridStore::new(2, 2).unwrap();
        store.excitation_prev_mut().as_mut_slice().fill(0.5);

        k.advance(&mut store.update_views(), &pool);

        let e = store.excitation().get(1, 1);
        let expected_e = 0.5 - 0.1 * (8.0 * 0.5 * (0.5 - 0.1) * (0.5 - 1.0));
        assert!((e - expected_e).abs() < 1e-15);
        let expected_r = 0.1 * (0.01 + 0.0) * (-0.0 - 8.0 * e * (e - 0.1 - 1.0));
        assert!((store.recovery().get(1, 1) - expected_r).abs() < 1e-15);
    }
}
