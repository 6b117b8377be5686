//! Benchmark profiles for the Panfilov simulator.
//!
//! Provides pre-built [`SimConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 200x200 grid on one worker
//! - [`stress_profile`]: 800x800 grid on one worker
//! - [`decomposed_profile`]: the reference grid split over a worker grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use panfilov_engine::SimConfig;
use panfilov_kinetics::InitialCondition;

/// Build a reference benchmark profile: 200x200 grid (40K cells).
///
/// Starts from a planar wave so every pass does real work; `t_final`
/// is large enough that benches never reach the end of the run.
pub fn reference_profile() -> SimConfig {
    SimConfig {
        n: 200,
        t_final: 1.0e6,
        initial: InitialCondition::PlanarWave,
        ..SimConfig::default()
    }
}

/// Build a stress benchmark profile: 800x800 grid (640K cells).
pub fn stress_profile() -> SimConfig {
    SimConfig {
        n: 800,
        ..reference_profile()
    }
}

/// The reference grid on a `px × py` worker grid, `threads` per worker,
/// run for `steps` steps of the default timestep.
pub fn decomposed_profile(px: usize, py: usize, threads: usize, steps: u32) -> SimConfig {
    let base = reference_profile();
    SimConfig {
        px,
        py,
        threads,
        // Half a step short of the target so the float clock stops at `steps`.
        t_final: base.dt * (f64::from(steps) - 0.5),
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_valid() {
        reference_profile().validate().unwrap();
        stress_profile().validate().unwrap();
        decomposed_profile(2, 2, 2, 10).validate().unwrap();
    }

    #[test]
    fn decomposed_profile_runs_the_requested_steps() {
        let cfg = SimConfig {
            n: 16,
            ..decomposed_profile(2, 1, 1, 7)
        };
        let report =
            panfilov_engine::Cluster::run(&cfg, &mut panfilov_engine::NoSnapshots).unwrap();
        assert_eq!(report.niter, 7);
    }
}
