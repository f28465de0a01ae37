//! Criterion benchmarks for u-wefe scoring, search, and optimization.
//!
//! Catalogs are synthetic and generated from a fixed seed, so every run
//! measures the same instances.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_wefe::catalog::{
    Indicator, IndicatorCatalog, IndicatorValues, Intervention, InterventionCatalog, LivingLab,
    Pillar, Policy, PolicyCatalog,
};
use u_wefe::impact::PolicySelection;
use u_wefe::optimizer::{Constraints, InterventionOptimizer, OptimizerConfig, SearchStrategy};
use u_wefe::scoring::{Normalizer, ScoringConfig};
use u_wefe::search::SearchIndex;
use u_wefe::simulation::Simulator;

// ===========================================================================
// Synthetic catalogs
// ===========================================================================

struct World {
    indicators: IndicatorCatalog,
    policies: PolicyCatalog,
    interventions: InterventionCatalog,
    lab: LivingLab,
}

fn world(indicators: usize, policies: usize, interventions: usize, seed: u64) -> World {
    let mut rng = StdRng::seed_from_u64(seed);

    let defs: Vec<Indicator> = (0..indicators)
        .map(|i| {
            let pillar = Pillar::ALL[i % Pillar::ALL.len()];
            Indicator::new(format!("i{i}"), format!("Indicator {i}"), pillar, 0.0, 100.0)
        })
        .collect();
    let indicator_catalog = IndicatorCatalog::new(defs).expect("valid indicators");

    let policy_defs: Vec<Policy> = (0..policies)
        .map(|p| {
            let mut policy = Policy::new(format!("p{p}"), format!("Policy {p}"));
            for _ in 0..4 {
                let target = rng.random_range(0..indicators);
                policy = policy.with_effect(format!("i{target}"), rng.random_range(-5.0..10.0));
            }
            policy
        })
        .collect();
    let policy_catalog = PolicyCatalog::new(policy_defs, &indicator_catalog).expect("valid policies");

    let intervention_defs: Vec<Intervention> = (0..interventions)
        .map(|k| {
            let mut iv = Intervention::new(
                format!("v{k}"),
                format!("Intervention {k}"),
                rng.random_range(1.0..10.0),
                rng.random_range(0.5..4.0),
            )
            .with_policy(format!("p{}", rng.random_range(0..policies)));
            for _ in 0..3 {
                let target = rng.random_range(0..indicators);
                iv = iv.with_effect(format!("i{target}"), rng.random_range(-3.0..12.0));
            }
            iv
        })
        .collect();
    let intervention_catalog =
        InterventionCatalog::new(intervention_defs, &indicator_catalog, &policy_catalog)
            .expect("valid interventions");

    let mut lab = LivingLab::new("bench", "Bench lab");
    for i in 0..indicators {
        lab = lab.with_value(format!("i{i}"), rng.random_range(0.0..100.0));
    }

    World {
        indicators: indicator_catalog,
        policies: policy_catalog,
        interventions: intervention_catalog,
        lab,
    }
}

fn all_policies(w: &World) -> PolicySelection {
    let ids: Vec<&str> = w.policies.iter().map(|p| p.id.as_str()).collect();
    PolicySelection::from_ids(&w.policies, ids).expect("valid selection")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for &n in &[50, 200, 1000] {
        let w = world(n, 4, 4, 42);
        let config = ScoringConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &w, |b, w| {
            let normalizer = Normalizer::new(&w.indicators, &config);
            b.iter(|| black_box(normalizer.score(black_box(&w.lab.values))))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for &p in &[20, 100, 500] {
        let w = world(40, p, 4, 7);
        group.bench_with_input(BenchmarkId::from_parameter(p), &w, |b, w| {
            let index = SearchIndex::new(&w.indicators, &w.policies);
            b.iter(|| black_box(index.find_policies_for_indicator(black_box("i3"))))
        });
    }
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);

    let cases = [
        (SearchStrategy::Exhaustive, 12),
        (SearchStrategy::Exhaustive, 16),
        (SearchStrategy::Greedy, 16),
        (SearchStrategy::Greedy, 60),
    ];
    for &(strategy, m) in &cases {
        let w = world(24, 6, m, 1234);
        let selection = all_policies(&w);
        let baseline: IndicatorValues = w.lab.values.clone();
        let scoring = ScoringConfig::default();
        let config = OptimizerConfig::default()
            .with_strategy(strategy)
            .with_require_policy_link(false);
        group.bench_with_input(
            BenchmarkId::new(format!("{strategy:?}"), m),
            &(w, selection, baseline),
            |b, (w, s, base)| {
                let optimizer = InterventionOptimizer::new(
                    &w.indicators,
                    &w.policies,
                    &w.interventions,
                    &scoring,
                    config.clone(),
                );
                b.iter(|| {
                    let rec = optimizer.optimize(black_box(base), s, Constraints::new(25.0, 8.0));
                    black_box(rec)
                })
            },
        );
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_run");
    group.sample_size(10);

    for &m in &[8, 32] {
        let w = world(40, 8, m, 99);
        let selection = all_policies(&w);
        group.bench_with_input(BenchmarkId::from_parameter(m), &(w, selection), |b, (w, s)| {
            let sim = Simulator::new(&w.indicators, &w.policies, &w.interventions);
            b.iter(|| black_box(sim.run(&w.lab, s, Constraints::new(30.0, 10.0))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_score,
    bench_search,
    bench_optimize,
    bench_simulation
);
criterion_main!(benches);
