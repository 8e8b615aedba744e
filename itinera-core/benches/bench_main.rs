use criterion::{Criterion, black_box, criterion_group, criterion_main};
use itinera_core::interchange::{self, InterchangeFormat};
use itinera_core::prelude::*;

fn sample_stops(count: usize) -> Vec<Stop> {
    (0..count)
        .map(|i| {
            let mut stop = Stop::new(Position {
                lat: 40.0 + (i % 20) as f64 * 0.5,
                lng: -5.0 + (i / 20) as f64 * 0.5,
            })
            .with_id(i.to_string())
            .with_name(format!("Stop {i}"));
            stop.travel_mode = Some(TravelMode::ALL[i % TravelMode::ALL.len()]);
            stop.activities.morning = "Walking tour".to_string();
            stop.disabled = i % 7 == 3;
            stop
        })
        .collect()
}

fn bench_views(c: &mut Criterion) {
    let stops = sample_stops(200);
    c.bench_function("views_build_200", |b| {
        b.iter(|| Views::build(black_box(&stops), Theme::Dark));
    });

    let views = Views::build(&stops, Theme::Dark);
    c.bench_function("map_layer_geojson_200", |b| {
        b.iter(|| black_box(&views.map).to_geojson_string());
    });
}

fn bench_interchange(c: &mut Criterion) {
    let stops = sample_stops(200);
    for format in [InterchangeFormat::GeoJson, InterchangeFormat::Kml] {
        let Ok(file) = interchange::encode(&stops, format) else {
            continue;
        };
        c.bench_function(&format!("decode_{format}_200"), |b| {
            b.iter(|| interchange::decode(black_box(&file.contents)));
        });
    }
}

criterion_group!(benches, bench_views, bench_interchange);
criterion_main!(benches);
