// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the safety checkers and the request path.

use banker::{
    AllocationState, ContinueScan, RequestProcessor, ResourceVector, RestartScan, SafetyChecker,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// `n` processes over `m` resources where only the last unfinished process
/// can ever proceed, so the restart scan walks the whole table on every pass.
fn reversed_chain(n: usize, m: usize) -> AllocationState {
    let max: Vec<Vec<u32>> = (0..n).map(|i| vec![(n - i + 1) as u32; m]).collect();
    let allocated: Vec<Vec<u32>> = (0..n).map(|_| vec![1; m]).collect();
    AllocationState::from_rows(&max, &allocated, &vec![1; m]).unwrap()
}

fn bench_checkers(c: &mut Criterion) {
    let mut group = c.benchmark_group("safety_check");
    for &n in &[8usize, 32, 128] {
        let state = reversed_chain(n, 4);
        group.bench_with_input(BenchmarkId::new("restart-scan", n), &state, |b, s| {
            b.iter(|| RestartScan::new().check(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("continue-scan", n), &state, |b, s| {
            b.iter(|| ContinueScan::new().check(black_box(s)))
        });
    }
    group.finish();
}

fn bench_submit(c: &mut Criterion) {
    let state = reversed_chain(64, 4);
    let request = ResourceVector::from_slice(&[1, 0, 0, 0]);
    c.bench_function("submit_and_release_64x4", |b| {
        let mut p = RequestProcessor::new(state.clone());
        b.iter(|| {
            if p.submit(63, black_box(&request)).is_ok() {
                p.release(63, &request).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_checkers, bench_submit);
criterion_main!(benches);
