use panfilov_core::{Discretization, ModelParams};

/// Single-threaded Aliev–Panfilov integrator over one padded
/// `(n + 2) × (n + 2)` grid.
///
/// Mirrors the global boundary, applies the diffusion, excitation and
/// recovery updates cell by cell, then swaps. No decomposition, no
/// threads, no halo exchange.
#[derive(Clone, Debug)]
pub struct SerialModel {
    n: usize,
    params: ModelParams,
    disc: Discretization,
    e_prev: Vec<f64>,
    e: Vec<f64>,
    r: Vec<f64>,
    steps: u64,
}

impl SerialModel {
    /// Start from row-major `n × n` interiors `e0` and `r0`.
    ///
    /// # Panics
    ///
    /// Panics if either field is not `n * n` long.
    pub fn new(n: usize, e0: &[f64], r0: &[f64], params: ModelParams, dt: f64) -> Self {
        assert_eq!(e0.len(), n * n, "e0 size");
        assert_eq!(r0.len(), n * n, "r0 size");
        let s = n + 2;
        let mut e_prev = vec![0.0; s * s];
        let mut r = vec![0.0; s * s];
        for row in 0..n {
            for col in 0..n {
                e_prev[(row + 1) * s + col + 1] = e0[row * n + col];
                r[(row + 1) * s + col + 1] = r0[row * n + col];
            }
        }
        Self {
            n,
            params,
            disc: Discretization::new(&params, n, dt),
            e_prev,
            e: vec![0.0; s * s],
            r,
            steps: 0,
        }
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance one timestep.
    pub fn step(&mut self) {
        let n = self.n;
        let s = n + 2;
        let at = |row: usize, col: usize| row * s + col;

        for col in 1..=n {
            self.e_prev[at(0, col)] = self.e_prev[at(2, col)];
            self.e_prev[at(n + 1, col)] = self.e_prev[at(n - 1, col)];
        }
        for row in 1..=n {
            self.e_prev[at(row, 0)] = self.e_prev[at(row, 2)];
            self.e_prev[at(row, n + 1)] = self.e_prev[at(row, n - 1)];
        }

        let ModelParams {
            kk,
            a,
            b,
            epsilon,
            m1,
            m2,
            ..
        } = self.params;
        let Discretization { dt, alpha, .. } = self.disc;

        for row in 1..=n {
            for col in 1..=n {
                let c = self.e_prev[at(row, col)];
                self.e[at(row, col)] = c + alpha
                    * (self.e_prev[at(row, col + 1)] + self.e_prev[at(row, col - 1)]
                        - 4.0 * c
                        + self.e_prev[at(row + 1, col)]
                        + self.e_prev[at(row - 1, col)]);
            }
        }
        for row in 1..=n {
            for col in 1..=n {
                let i = at(row, col);
                let e = self.e[i];
                self.e[i] = e - dt * (kk * e * (e - a) * (e - 1.0) + e * self.r[i]);
            }
        }
        for row in 1..=n {
            for col in 1..=n {
                let i = at(row, col);
                let e = self.e[i];
                let r = self.r[i];
                self.r[i] = r + dt * (epsilon + m1 * r / (e + m2)) * (-r - kk * e * (e - b - 1.0));
            }
        }

        std::mem::swap(&mut self.e, &mut self.e_prev);
        self.steps += 1;
    }

    /// Advance `steps` timesteps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Current excitation interior, row-major `n × n`.
    pub fn excitation(&self) -> Vec<f64> {
        self.interior(&self.e_prev)
    }

    /// Current recovery interior, row-major `n × n`.
    pub fn recovery(&self) -> Vec<f64> {
        self.interior(&self.r)
    }

    fn interior(&self, padded: &[f64]) -> Vec<f64> {
        let s = self.n + 2;
        (1..=self.n)
            .flat_map(|row| padded[row * s + 1..row * s + 1 + self.n].iter().copied())
            .collect()
    }
}
