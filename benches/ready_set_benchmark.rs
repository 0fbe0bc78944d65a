/*!
 * Scheduler Benchmarks
 *
 * Ready-set selection policies and end-to-end dispatch throughput
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlfq_sim::{InstantRunner, Job, ReadySet, Scheduler, SchedulerConfig, SelectionPolicy, WorkerPool};
use std::sync::Arc;
use std::time::Duration;

fn job(id: u64) -> Job {
    Job::new(id, Vec::new(), (id % 100) as u8, (id % 50) as u32 + 1).unwrap()
}

fn bench_policy_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_push_pop");

    for policy in [
        SelectionPolicy::Lifo,
        SelectionPolicy::Fifo,
        SelectionPolicy::ShortestJob,
        SelectionPolicy::Priority,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", policy)),
            &policy,
            |b, &policy| {
                let set = ReadySet::new(0, 256, policy).unwrap();
                b.iter(|| {
                    for id in 0..128 {
                        set.push(job(id));
                    }
                    while let Some(job) = set.try_pop() {
                        black_box(job);
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_throughput");
    group.sample_size(20);

    for workers in [1usize, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let sched = Scheduler::new(
                    &SchedulerConfig::default()
                        .with_capacity(4096)
                        .with_boost_interval(Duration::from_millis(5)),
                )
                .unwrap();
                let (tx, rx) = flume::unbounded();
                let pool = WorkerPool::spawn(workers, &sched, Arc::new(InstantRunner), &tx).unwrap();
                drop(tx);

                for id in 1..=1000 {
                    sched.admit(job(id)).unwrap();
                }
                sched.shutdown();
                pool.join().unwrap();
                black_box(rx.iter().count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_policy_push_pop, bench_dispatch_throughput);
criterion_main!(benches);
