use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use milp_struct::bounds::{
    GreedyHeuristics, LowerBoundHeuristic, TorsoReducer, TreedepthHeuristic, TreewidthHeuristics,
    UpperBoundHeuristic,
};
use milp_struct::graph::{IdAllocator, NodeKind};
use milp_struct::pipeline::CancellationToken;
use milp_struct::GraphModel;

fn random_graph(nodes: usize, probability: f64, seed: u64) -> GraphModel {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut ids = IdAllocator::new();
    let mut graph = GraphModel::with_capacity(nodes, nodes * 4);
    let indices: Vec<_> = (0..nodes)
        .map(|i| graph.add_node(&mut ids, NodeKind::Variable, &format!("v{i}"), rng.gen_bool(0.5)))
        .collect();

    for i in 0..nodes {
        for j in (i + 1)..nodes {
            if rng.gen_bool(probability) {
                graph.add_edge(indices[i], indices[j]);
            }
        }
    }
    graph
}

fn bench_bound_heuristics(c: &mut Criterion) {
    let graph_small = random_graph(64, 0.15, 42);
    let graph_medium = random_graph(256, 0.04, 7);
    let token = CancellationToken::new();
    let greedy_degree = GreedyHeuristics::default();
    let fill_in = GreedyHeuristics::new(LowerBoundHeuristic::MinDegree, UpperBoundHeuristic::GreedyFillIn);

    let mut group = c.benchmark_group("bound_heuristics");

    for (label, graph) in [("64", &graph_small), ("256", &graph_medium)] {
        group.bench_function(format!("minor_min_width_{label}"), |b| {
            b.iter(|| black_box(greedy_degree.lower_bound(graph, &token).ok()));
        });
        group.bench_function(format!("min_degree_{label}"), |b| {
            b.iter(|| black_box(fill_in.lower_bound(graph, &token).ok()));
        });
        group.bench_function(format!("greedy_degree_{label}"), |b| {
            b.iter(|| black_box(greedy_degree.upper_bound(graph, &token).ok()));
        });
        group.bench_function(format!("greedy_fill_in_{label}"), |b| {
            b.iter(|| black_box(fill_in.upper_bound(graph, &token).ok()));
        });
        group.bench_function(format!("torso_{label}"), |b| {
            b.iter(|| black_box(TorsoReducer::reduce(graph, &token).map(|t| t.edge_count()).ok()));
        });
        group.bench_function(format!("treedepth_{label}"), |b| {
            b.iter(|| black_box(TreedepthHeuristic::upper_bound(graph, &token).ok()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bound_heuristics);
criterion_main!(benches);
