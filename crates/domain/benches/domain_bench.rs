use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Cargo, Delivery, HandlingActivity, HandlingEvent, HandlingHistory, Itinerary, Leg,
    RouteSpecification, TrackingId,
};
use std::hint::black_box;

const PORTS: [&str; 6] = ["IDJKT", "IDBDG", "IDSRG", "IDSUB", "IDDPS", "IDSLO"];

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn long_itinerary() -> Itinerary {
    let legs = PORTS
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let load = start() + Duration::days(i as i64 * 2);
            Leg::new("V1", pair[0], pair[1], load, load + Duration::days(1)).unwrap()
        })
        .collect();
    Itinerary::new(legs).unwrap()
}

fn bench_derive_unhandled(c: &mut Criterion) {
    let spec = RouteSpecification::new("IDJKT", "IDSLO", start() + Duration::days(30));
    let itinerary = long_itinerary();

    c.bench_function("domain/derive_unhandled", |b| {
        b.iter(|| Delivery::derive(black_box(&spec), black_box(&itinerary), None));
    });
}

fn bench_derive_after_unload(c: &mut Criterion) {
    let spec = RouteSpecification::new("IDJKT", "IDSLO", start() + Duration::days(30));
    let itinerary = long_itinerary();
    let event = HandlingEvent::new(
        TrackingId::new("BENCH"),
        HandlingActivity::unload("IDSUB", "V1"),
        start(),
    );

    c.bench_function("domain/derive_after_unload", |b| {
        b.iter(|| Delivery::derive(black_box(&spec), black_box(&itinerary), Some(&event)));
    });
}

fn bench_delivery_progress(c: &mut Criterion) {
    let spec = RouteSpecification::new("IDJKT", "IDSLO", start() + Duration::days(30));
    let mut cargo = Cargo::new(TrackingId::new("BENCH"), spec);
    cargo.assign_to_route(long_itinerary());

    let events = (0..100)
        .map(|i| {
            HandlingEvent::new(
                TrackingId::new("BENCH"),
                HandlingActivity::customs("IDSRG"),
                start() + Duration::hours(i),
            )
        })
        .collect();
    let history = HandlingHistory::new(events);

    c.bench_function("domain/derive_delivery_progress", |b| {
        b.iter(|| cargo.derive_delivery_progress(black_box(&history)));
    });
}

criterion_group!(
    benches,
    bench_derive_unhandled,
    bench_derive_after_unload,
    bench_delivery_progress
);
criterion_main!(benches);
