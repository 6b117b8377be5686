//! Single-worker stepping (mirror + three passes + swap) against the
//! plain serial model, plus the textbook scenarios.

use panfilov_core::{Discretization, ModelParams, Rank};
use panfilov_grid::{GridStore, Partition, WorkerPool, WorkerTopology};
use panfilov_halo::mirror_edges;
use panfilov_kinetics::{InitialCondition, Kinetics};
use panfilov_test_utils::{random_field, SerialModel};
use proptest::prelude::*;

struct Worker {
    store: GridStore,
    kinetics: Kinetics,
    pool: WorkerPool,
}

impl Worker {
    fn new(n: usize, initial: &InitialCondition, threads: usize) -> Self {
        let params = ModelParams::default();
        let partition = Partition::new(n, WorkerTopology::single(), Rank(0));
        let mut store = GridStore::new(n, n).unwrap();
        initial.apply(&mut store, &partition);
        Self {
            store,
            kinetics: Kinetics::new(params, Discretization::new(&params, n, 0.1)),
            pool: WorkerPool::new(threads, 0).unwrap(),
        }
    }

    fn step(&mut self) {
        let prev = self.store.excitation_prev_mut();
        self.pool.install(|| mirror_edges(prev));
        self.kinetics
            .advance(&mut self.store.update_views(), &self.pool);
        self.store.swap();
    }
}

fn seeded(values: Vec<f64>, recovery: Vec<f64>, n: usize) -> InitialCondition {
    InitialCondition::custom(move |row, col| (values[row * n + col], recovery[row * n + col]))
}

#[test]
fn single_seeded_cell_one_step() {
    let n = 4;
    // Padded cell (2, 2) is global (1, 1).
    let ic = InitialCondition::custom(|row, col| if (row, col) == (1, 1) { (1.0, 0.0) } else { (0.0, 0.0) });
    let mut w = Worker::new(n, &ic, 1);
    w.step();

    let p = ModelParams::default();
    let alpha = Discretization::new(&p, n, 0.1).alpha;
    let e = w.store.current();

    let centre = e.get(2, 2);
    let diffused = 1.0 - 4.0 * alpha;
    let expected_centre =
        diffused - 0.1 * (p.kk * diffused * (diffused - p.a) * (diffused - 1.0));
    assert!((centre - expected_centre).abs() < 1e-15);
    assert!(centre < 1.0, "seeded cell must lose excitation");

    // Neighbours gain a small positive contribution proportional to
    // alpha. The north and west neighbours also see the mirrored seed.
    for (r, c, weight) in [(1, 2, 2.0), (2, 1, 2.0), (3, 2, 1.0), (2, 3, 1.0)] {
        let v = e.get(r, c);
        assert!(v > 0.0 && v < weight * alpha, "({r}, {c}) = {v}");
        assert!(v > 0.9 * weight * alpha, "({r}, {c}) = {v}");
    }

    let touched = [(2, 2), (1, 2), (2, 1), (3, 2), (2, 3)];
    for r in 1..=n {
        for c in 1..=n {
            if !touched.contains(&(r, c)) {
                assert_eq!(e.get(r, c), 0.0, "({r}, {c}) should stay at rest");
            }
        }
    }
}

#[test]
fn zero_field_stays_exactly_zero() {
    let mut w = Worker::new(6, &InitialCondition::Quiescent, 2);
    for _ in 0..50 {
        w.step();
    }
    assert!(w.store.current().as_slice().iter().all(|&v| v == 0.0));
    assert!(w.store.recovery().as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn planar_wave_matches_serial() {
    let n = 12;
    let ic = InitialCondition::PlanarWave;
    let e0: Vec<f64> = (0..n * n).map(|i| ic.sample(n, i / n, i % n).0).collect();
    let r0: Vec<f64> = (0..n * n).map(|i| ic.sample(n, i / n, i % n).1).collect();

    let mut w = Worker::new(n, &ic, 3);
    let mut serial = SerialModel::new(n, &e0, &r0, ModelParams::default(), 0.1);
    for _ in 0..20 {
        w.step();
    }
    serial.run(20);
    assert_eq!(w.store.current().interior_to_vec(), serial.excitation());
    assert_eq!(w.store.recovery().interior_to_vec(), serial.recovery());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stepping_matches_serial_reference(
        n in 2usize..10,
        steps in 1u64..6,
        threads in 1usize..4,
        seed in any::<u64>(),
    ) {
        let e0 = random_field(n * n, seed, 0.0..1.0);
        let r0 = random_field(n * n, seed.wrapping_add(1), 0.0..0.5);

        let mut w = Worker::new(n, &seeded(e0.clone(), r0.clone(), n), threads);
        let mut serial = SerialModel::new(n, &e0, &r0, ModelParams::default(), 0.1);
        for _ in 0..steps {
            w.step();
        }
        serial.run(steps);

        for (a, b) in w.store.current().interior_to_vec().iter().zip(serial.excitation()) {
            prop_assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0), "{} vs {}", a, b);
        }
        for (a, b) in w.store.recovery().interior_to_vec().iter().zip(serial.recovery()) {
            prop_assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0), "{} vs {}", a, b);
        }
    }
}
