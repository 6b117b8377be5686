//! Aliev–Panfilov model constants and the derived discretization.
//!
//! [`ModelParams`] holds the physical constants of the two-variable
//! model; [`Discretization`] combines them with the grid size and
//! timestep into the numbers the update passes actually consume.

use crate::error::ParamError;

/// Default explicit-Euler timestep.
pub const DEFAULT_DT: f64 = 0.1;

/// Explicit 5-point diffusion is stable only while `alpha <= 1/4`.
const ALPHA_STABILITY_LIMIT: f64 = 0.25;

/// Physical constants of the Aliev–Panfilov model.
///
/// Immutable for the duration of a run. The defaults are the classic
/// parameter set for ventricular tissue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelParams {
    /// Diffusion coefficient `d`.
    pub d: f64,
    /// Coupling strength `kk` of the cubic excitation term.
    pub kk: f64,
    /// Excitation threshold `a`.
    pub a: f64,
    /// Recovery offset `b`.
    pub b: f64,
    /// Baseline recovery rate `epsilon`.
    pub epsilon: f64,
    /// Recovery rate constant `M1`.
    pub m1: f64,
    /// Recovery offset constant `M2`.
    pub m2: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            d: 5e-5,
            kk: 8.0,
            a: 0.1,
            b: 0.1,
            epsilon: 0.01,
            m1: 0.07,
            m2: 0.3,
        }
    }
}

impl ModelParams {
    /// Check that every constant is finite and the diffusion coefficient
    /// is non-negative.
    pub fn validate(&self) -> Result<(), ParamError> {
        let named = [
            ("d", self.d),
            ("kk", self.kk),
            ("a", self.a),
            ("b", self.b),
            ("epsilon", self.epsilon),
            ("m1", self.m1),
            ("m2", self.m2),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name, value });
            }
        }
        if self.d < 0.0 {
            return Err(ParamError::NegativeDiffusion { value: self.d });
        }
        Ok(())
    }
}

/// Numerical constants derived from [`ModelParams`], the global grid
/// size and the timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Discretization {
    /// Timestep.
    pub dt: f64,
    /// Spatial step, `1 / n`.
    pub dx: f64,
    /// Diffusion number, `d * dt / dx²`.
    pub alpha: f64,
}

impl Discretization {
    /// Derive the discretization for an `n × n` global grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use panfilov_core::{Discretization, ModelParams};
    ///
    /// let disc = Discretization::new(&ModelParams::default(), 4, 0.1);
    /// assert!((disc.alpha - 5e-5 * 0.1 * 16.0).abs() < 1e-18);
    /// ```
    pub fn new(params: &ModelParams, n: usize, dt: f64) -> Self {
        let dx = 1.0 / n as f64;
        Self {
            dt,
            dx,
            alpha: params.d * dt / (dx * dx),
        }
    }

    /// Whether the diffusion step is within the explicit-Euler stability
    /// limit. Unstable runs are allowed but will blow up.
    pub fn is_stable(&self) -> bool {
        self.alpha <= ALPHA_STABILITY_LIMIT
    }

    /// The stability bound on `alpha`.
    pub fn stability_limit() -> f64 {
        ALPHA_STABILITY_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_reference_tissue() {
        let p = ModelParams::default();
        assert_eq!(p.kk, 8.0);
        assert_eq!(p.a, 0.1);
        assert_eq!(p.b, 0.1);
        assert_eq!(p.m1, 0.07);
        assert_eq!(p.m2, 0.3);
        assert_eq!(p.epsilon, 0.01);
        assert_eq!(p.d, 5e-5);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_nan() {
        let p = ModelParams {
            kk: f64::NAN,
            ..ModelParams::default()
        };
        let err = p.validate().unwrap_err();
        assert!(matches!(err, ParamError::NonFinite { name: "kk", .. }));
        assert!(err.to_string().contains("kk"), "{err}");
    }

    #[test]
    fn validate_rejects_negative_diffusion() {
        let p = ModelParams {
            d: -1.0,
            ..ModelParams::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamError::NegativeDiffusion { value: -1.0 })
        );
    }

    #[test]
    fn default_grid_is_past_stability_limit() {
        // n = 400 with dt = 0.1 gives alpha = 0.8.
        let disc = Discretization::new(&ModelParams::default(), 400, DEFAULT_DT);
        assert!((disc.alpha - 0.8).abs() < 1e-12);
        assert!(!disc.is_stable());
    }

    #[test]
    fn small_grid_is_stable() {
        let disc = Discretization::new(&ModelParams::default(), 100, DEFAULT_DT);
        assert!((disc.alpha - 0.05).abs() < 1e-12);
        assert!(disc.is_stable());
    }

    proptest! {
        #[test]
        fn alpha_scales_with_n_squared(n in 1usize..2000, dt in 1e-4f64..1.0) {
            let p = ModelParams::default();
            let disc = Discretization::new(&p, n, dt);
            let expected = p.d * dt * (n as f64) * (n as f64);
            prop_assert!((disc.alpha - expected).abs() <= expected * 1e-12);
            prop_assert!((disc.dx * n as f64 - 1.0).abs() < 1e-12);
        }
    }
}
