//! # Notary-Ledger Lifecycle Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `lifecycle-issue` | simulate + commit of one issuance |
//! | `lifecycle-read` | `get` and `verify` against a populated ledger |
//! | `secondary-index` | case-insensitive lookup as the ledger grows |
//! | `ledger-commit` | read-set validation cost per written key |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nl_01_ledger_substrate::prelude::*;
use nl_02_notarization::prelude::*;
use std::time::Duration;

const T0: i64 = 1_704_067_200;

fn notary() -> Credential {
    Credential::new("Org1MSP").with_attribute("role", "NOTARY")
}

fn payload(i: usize, instrument_no: &str) -> String {
    format!(
        r#"{{"id":"ins-{i}","caseId":"case-{i}","instrumentNo":"{instrument_no}","contentHash":"ABCDEF{i:08}"}}"#
    )
}

fn populated(config: &NotarizationConfig, count: usize, shared_numbers: usize) -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    let lifecycle = InstrumentLifecycle::new(config);
    for i in 0..count {
        let no = format!("N-{}", i % shared_numbers.max(1));
        let mut sim = ledger.begin(Proposal::new(
            TxId::new(format!("seed-{i}")),
            TxTimestamp::from_seconds(T0),
            notary(),
        ));
        lifecycle
            .issue(&mut sim, &payload(i, &no), false)
            .expect("seed issue");
        sim.commit().expect("seed commit");
    }
    ledger
}

// ============================================================================
// ISSUANCE
// ============================================================================

fn bench_issue(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle-issue");
    group.measurement_time(Duration::from_secs(5));
    let config = NotarizationConfig::default();
    let lifecycle = InstrumentLifecycle::new(&config);

    group.bench_function("issue_and_commit", |b| {
        let ledger = InMemoryLedger::new();
        let mut i = 0usize;
        b.iter(|| {
            i += 1;
            let mut sim = ledger.begin(Proposal::new(
                TxId::new(format!("tx-{i}")),
                TxTimestamp::from_seconds(T0),
                notary(),
            ));
            let instrument = lifecycle
                .issue(&mut sim, &payload(i, "N-1"), i % 2 == 0)
                .expect("issue");
            black_box(sim.commit().expect("commit"));
            black_box(instrument)
        });
    });

    group.finish();
}

// ============================================================================
// READS
// ============================================================================

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle-read");
    let config = NotarizationConfig::default();
    let lifecycle = InstrumentLifecycle::new(&config);
    let ledger = populated(&config, 1_000, 1_000);

    group.bench_function("get", |b| {
        b.iter(|| {
            let mut sim = ledger.begin(Proposal::new(
                TxId::new("read"),
                TxTimestamp::from_seconds(T0),
                notary(),
            ));
            black_box(lifecycle.get(&mut sim, "ins-500").expect("get"))
        });
    });

    group.bench_function("verify_case_insensitive", |b| {
        b.iter(|| {
            let mut sim = ledger.begin(Proposal::new(
                TxId::new("read"),
                TxTimestamp::from_seconds(T0),
                notary(),
            ));
            black_box(
                lifecycle
                    .verify(&mut sim, "ins-500", "abcdef00000500")
                    .expect("verify"),
            )
        });
    });

    group.finish();
}

// ============================================================================
// SECONDARY INDEX
// ============================================================================

fn bench_index_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("secondary-index");
    let config = NotarizationConfig::default();
    let lifecycle = InstrumentLifecycle::new(&config);

    for size in [100usize, 1_000, 5_000] {
        // Ten instruments share each number.
        let ledger = populated(&config, size, size / 10);
        group.throughput(Throughput::Elements(10));
        group.bench_with_input(BenchmarkId::new("find_by_instrument_no", size), &ledger, |b, ledger| {
            b.iter(|| {
                let mut sim = ledger.begin(Proposal::new(
                    TxId::new("find"),
                    TxTimestamp::from_seconds(T0),
                    notary(),
                ));
                black_box(
                    lifecycle
                        .find_by_instrument_no(&mut sim, "n-7")
                        .expect("lookup"),
                )
            });
        });
    }

    group.finish();
}

// ============================================================================
// LEDGER COMMIT
// ============================================================================

fn bench_commit_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger-commit");

    for keys in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(keys as u64));
        group.bench_with_input(BenchmarkId::new("read_modify_write", keys), &keys, |b, &keys| {
            let ledger = InMemoryLedger::new();
            let mut n = 0usize;
            b.iter(|| {
                n += 1;
                let mut sim = ledger.begin(Proposal::new(
                    TxId::new(format!("rmw-{n}")),
                    TxTimestamp::from_seconds(T0),
                    notary(),
                ));
                for k in 0..keys {
                    let key = format!("K|{k}");
                    let _ = sim.get_state(&key).expect("read");
                    sim.put_state(&key, n.to_le_bytes().to_vec()).expect("write");
                }
                black_box(sim.commit().expect("commit"))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_issue,
    bench_reads,
    bench_index_lookup,
    bench_commit_validation
);
criterion_main!(benches);
