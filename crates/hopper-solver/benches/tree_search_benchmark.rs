// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hopper_model::problem::{ProblemData, ProblemDataBuilder};
use hopper_solver::tree::TreeSearch;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const CAPACITY: u32 = 100;

/// Uniform weights in `[20, 60]`, a classic hard-ish range for pairing.
fn random_instance(num_items: usize, seed: u64) -> ProblemData<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    ProblemDataBuilder::with_capacity(CAPACITY, num_items)
        .with_items((0..num_items).map(|_| rng.random_range(20..=60)))
        .build()
        .expect("Failed to build benchmark instance")
}

fn bench_tree_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_search");
    group.sample_size(10);

    for &num_items in &[10usize, 20, 30] {
        let data = random_instance(num_items, 0xB1A5 + num_items as u64);
        group.throughput(Throughput::Elements(num_items as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_items), &data, |b, data| {
            let search = TreeSearch::new().with_node_limit(500);
            b.iter(|| {
                let outcome = search.solve(black_box(data)).expect("search failed");
                black_box(outcome.best_num_bins())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tree_search);
criterion_main!(benches);
