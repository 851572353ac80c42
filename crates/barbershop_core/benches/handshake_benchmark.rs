//! # Handshake Benchmark
//!
//! Measures what a customer visit costs:
//! 1. Seat churn (acquire + release) on the waiting room
//! 2. A gate round-trip, uncontended and across two threads
//! 3. A full service cycle with a zero-length haircut

#![allow(missing_docs)]

use barbershop_core::{
    Absent, BarberProtocol, CustomerProtocol, RendezvousGate, ShopConfig, ShopFloor, ShopStats,
    WaitingRoom,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn bench_seat_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("waiting_room_churn");

    for capacity in [1, 3, 16] {
        let room = WaitingRoom::new(capacity);
        group.bench_with_input(BenchmarkId::new("acquire_release", capacity), &capacity, |b, _| {
            b.iter(|| {
                if let Some(seat) = room.acquire_seat().seat() {
                    room.release_seat(black_box(seat));
                }
            });
        });
    }

    group.finish();
}

fn bench_gate_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_round_trip");

    let gate = RendezvousGate::new();
    group.bench_function("uncontended", |b| {
        b.iter(|| {
            gate.signal();
            gate.await_and_consume();
        });
    });

    // Ping-pong between two threads over a pair of gates.
    let ping = Arc::new(RendezvousGate::new());
    let pong = Arc::new(RendezvousGate::new());
    {
        let ping = Arc::clone(&ping);
        let pong = Arc::clone(&pong);
        thread::spawn(move || loop {
            ping.await_and_consume();
            pong.signal();
        });
    }
    group.bench_function("ping_pong", |b| {
        b.iter(|| {
            ping.signal();
            pong.await_and_consume();
        });
    });

    group.finish();
}

fn bench_service_cycle(c: &mut Criterion) {
    let config = ShopConfig::default().with_service_duration(Duration::ZERO);
    let floor = ShopFloor::new(config.capacity);
    let stats = Arc::new(ShopStats::new());

    {
        let barber = BarberProtocol::new(floor.clone(), Absent, &config, Arc::clone(&stats));
        thread::spawn(move || {
            barber.run();
        });
    }

    let mut id = 0u64;
    c.bench_function("service_cycle", |b| {
        b.iter(|| {
            id += 1;
            let customer = CustomerProtocol::new(
                id,
                floor.clone(),
                Absent,
                config.layout.clone(),
                Arc::clone(&stats),
            );
            black_box(customer.run())
        });
    });
}

criterion_group!(benches, bench_seat_churn, bench_gate_round_trip, bench_service_cycle);
criterion_main!(benches);
