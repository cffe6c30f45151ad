//! Performance benchmarks for the credential transform and stat lookups

use server::registration::register;
use server::session_stats::record_session;
use server::sqlite::SqliteStore;
use server::statistics::get_stats;
use shared::{hash, transform, RegistrationRequest, StatKind, StatsLookup, FIXED_SHIFT};
use std::time::Instant;

/// Benchmarks the credential transform on typical password lengths
#[test]
fn benchmark_credential_transform() {
    let password = "correct horse battery staple";
    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = transform(password.as_bytes(), FIXED_SHIFT);
    }

    let duration = start.elapsed();
    println!(
        "Credential transform: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 500ms for 100k iterations
    assert!(duration.as_millis() < 500);
}

/// Benchmarks the client-side hash used at login
#[test]
fn benchmark_client_hash() {
    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = hash(if i % 2 == 0 { "pw" } else { "hunter2" });
    }

    let duration = start.elapsed();
    println!("Client hash: {} iterations in {:?}", iterations, duration);

    assert!(duration.as_millis() < 500);
}

/// Benchmarks a full stats lookup for a player with every stat filled in
#[test]
fn benchmark_stats_lookup() {
    let mut store = SqliteStore::in_memory().unwrap();
    let request = RegistrationRequest {
        username: "bench",
        password: "pw",
        confirm_password: "pw",
    };
    register(&mut store, &request).unwrap();

    let values: Vec<_> = StatKind::ALL.iter().map(|&kind| (kind, 10)).collect();
    record_session(&mut store, 1, &values).unwrap();

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        match get_stats(&mut store, "bench").unwrap() {
            StatsLookup::Found(report) => assert_eq!(report.global.len(), StatKind::ALL.len()),
            StatsLookup::NotFound => panic!("bench user missing"),
        }
    }

    let duration = start.elapsed();
    println!(
        "Stats lookup: {} iterations in {:?} ({:.2} us/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2s for 1k lookups
    assert!(duration.as_secs() < 2);
}

/// Benchmarks registration throughput including the uniqueness check
#[test]
fn benchmark_registration() {
    let mut store = SqliteStore::in_memory().unwrap();
    let names: Vec<String> = (0..500).map(|i| format!("player{}", i)).collect();

    let start = Instant::now();
    for name in &names {
        let request = RegistrationRequest {
            username: name,
            password: "pw",
            confirm_password: "pw",
        };
        assert!(register(&mut store, &request).unwrap().is_accepted());
    }
    let duration = start.elapsed();

    println!("Registration: {} accounts in {:?}", names.len(), duration);

    assert!(duration.as_secs() < 5);
}
