use field_engine::Engine;
use field_engine::field::registry::{BUILTIN_CONSERVATIVE, BUILTIN_ROTATIONAL};
use field_engine::path::PathKind;
use field_engine::work::{SweepPoint, find_minimum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ORIGIN: [f64; 2] = [0.0, 0.0];
const ONE: [f64; 2] = [1.0, 1.0];

#[test]
fn gradient_line_work_is_exact_for_any_sample_count() {
    let engine = Engine::new();
    for samples in [2, 500, 6000] {
        let work = engine
            .compute_work(BUILTIN_CONSERVATIVE, PathKind::Line, ORIGIN, ONE, None, samples)
            .expect("work");
        assert!((work - 2.0).abs() < 1e-9, "n = {samples}: {work}");
    }
}

#[test]
fn curved_path_error_shrinks_with_more_samples() {
    let engine = Engine::new();
    let errors: Vec<f64> = [10, 100, 1000]
        .into_iter()
        .map(|samples| {
            let work = engine
                .compute_work(BUILTIN_ROTATIONAL, PathKind::CanonicalParabola, ORIGIN, ONE, None, samples)
                .expect("work");
            (work - 1.0 / 3.0).abs()
        })
        .collect();
    assert!(errors[0] > errors[1] && errors[1] > errors[2], "{errors:?}");
    assert!(errors[2] < 1e-6, "{errors:?}");
}

#[test]
fn gradient_work_is_path_independent() {
    let engine = Engine::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let start = [rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)];
        let end = [rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)];
        let shape = rng.random_range(-2.0..2.0);
        let expected = (end[0] * end[0] + end[1] * end[1]) - (start[0] * start[0] + start[1] * start[1]);
        for kind in [PathKind::Line, PathKind::Parabola, PathKind::Family] {
            let work = engine
                .compute_work(BUILTIN_CONSERVATIVE, kind, start, end, Some(shape), 2000)
                .expect("work");
            assert!((work - expected).abs() < 5e-5, "{kind}: {work} vs {expected}");
        }
    }
}

#[test]
fn rotation_work_depends_on_the_path() {
    let engine = Engine::new();
    let line = engine
        .compute_work(BUILTIN_ROTATIONAL, PathKind::Line, ORIGIN, ONE, None, 2000)
        .expect("work");
    let parabola = engine
        .compute_work(BUILTIN_ROTATIONAL, PathKind::Parabola, ORIGIN, ONE, None, 2000)
        .expect("work");
    assert!(line.abs() < 1e-12);
    assert!((parabola - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn curl_classification_of_known_fields() {
    let mut engine = Engine::new();
    let cases = [
        ("x", "y", true),
        ("y", "x", true),
        ("y*cos(x*y)", "x*cos(x*y)", true),
        ("exp(x)*sin(y)", "exp(x)*cos(y)", true),
        ("-y", "x", false),
        ("x*y", "0", false),
        ("sin(y)", "cos(x)", false),
    ];
    for (p, q, conservative) in cases {
        let (_, record) = engine.register_field("", p, q).expect("register");
        assert_eq!(record.is_conservative(), conservative, "({p}, {q})");
    }
}

#[test]
fn recovered_potentials_reproduce_random_gradients() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut engine = Engine::new();
    for round in 0..8 {
        let c: [f64; 4] = std::array::from_fn(|_| rng.random_range(-3.0..3.0));
        let potential = |x: f64, y: f64| {
            c[0] * x * x * y + c[1] * x * y.powi(3) + c[2] * x.exp() + c[3] * y.sin()
        };
        let p = format!("2*({})*x*y + ({})*y^3 + ({})*exp(x)", c[0], c[1], c[2]);
        let q = format!("({})*x^2 + 3*({})*x*y^2 + ({})*cos(y)", c[0], c[1], c[3]);

        let (name, record) = engine
            .register_field(&format!("random {round}"), &p, &q)
            .expect("register");
        assert!(record.is_conservative(), "{name}: curl {}", record.curl());
        let recovered = record.potential().potential().expect("recovered");

        let offset = recovered.eval(0.0, 0.0) - potential(0.0, 0.0);
        for _ in 0..5 {
            let x = rng.random_range(-1.5..1.5);
            let y = rng.random_range(-1.5..1.5);
            let difference = recovered.eval(x, y) - potential(x, y) - offset;
            assert!(difference.abs() < 1e-9, "{name} at ({x}, {y}): {difference}");
        }
    }
}

#[test]
fn fields_without_closed_form_potential_stay_registered() {
    let mut engine = Engine::new();
    let (name, record) = engine
        .register_field("gauss", "exp(x^2)", "0")
        .expect("register");
    assert!(record.is_conservative());
    assert!(!record.potential().is_recovered());

    let summary = engine.field_summary(&name).expect("registered");
    assert_eq!(summary.potential, None);
    assert!(summary.potential_note.is_some());

    // The field itself still integrates numerically.
    let work = engine
        .compute_work(&name, PathKind::Line, ORIGIN, [1.0, 0.0], None, 2000)
        .expect("work");
    assert!((work - 1.462_651_745_907_181_6).abs() < 1e-6);
}

#[test]
fn sweeps_are_deterministic() {
    let engine = Engine::new();
    let values = engine.config().sweep.display_values();
    let first = engine
        .sweep_family(BUILTIN_ROTATIONAL, ORIGIN, ONE, &values, 800)
        .expect("sweep");
    let second = engine
        .sweep_family(BUILTIN_ROTATIONAL, ORIGIN, ONE, &values, 800)
        .expect("sweep");
    assert_eq!(first, second);
    assert_eq!(first.len(), values.len());
}

#[test]
fn minimum_is_the_first_of_equal_values() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..20 {
        let len = rng.random_range(3..40);
        let mut points: Vec<SweepPoint> = (0..len)
            .map(|i| SweepPoint {
                a: i as f64,
                work: rng.random_range(0.0..10.0),
            })
            .collect();
        let first = rng.random_range(0..len - 1);
        let second = rng.random_range(first + 1..len);
        points[first].work = -1.0;
        points[second].work = -1.0;

        let minimum = find_minimum(&points).expect("non-empty");
        assert_eq!(minimum.a, first as f64);
        assert_eq!(minimum.work, -1.0);
    }
}
