use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skolni_mapa::catalog::CategoryIndex;
use skolni_mapa::data::{Dataset, SchoolRecord, TypeSchema};
use skolni_mapa::filter::{authority_options, filter, FilterSelection, Picks, RegionChoice};
use skolni_mapa::geo::LatLon;
use skolni_mapa::map::MapRenderer;
use skolni_mapa::viewport::{ViewportState, REGION_CENTERS};

const AUTHORITIES: [&str; 6] = ["obec", "kraj", "církev", "soukromník", "MŠMT", "jiný resort"];
const TYPES: [&str; 5] = [
    "Mateřská škola",
    "Základní škola",
    "Školní družina",
    "Školní jídelna",
    "Gymnázium",
];

/// Register-sized synthetic dataset
fn synthetic_dataset(n: usize) -> Dataset {
    let records = (0..n)
        .map(|i| {
            let (region, center) = REGION_CENTERS[i % REGION_CENTERS.len()];
            let jitter = (i % 97) as f64 * 0.003;
            SchoolRecord {
                name: format!("Škola {i}"),
                authority: AUTHORITIES[i % AUTHORITIES.len()].to_string(),
                region: region.to_string(),
                coordinates: LatLon::new(center.lat + jitter, center.lon - jitter),
                types: (0..3)
                    .map(|c| (i + c) % 4 != 0)
                    .enumerate()
                    .map(|(c, present)| present.then(|| TYPES[(i + c) % TYPES.len()].to_string()))
                    .collect(),
            }
        })
        .collect();

    Dataset {
        schema: TypeSchema::new(vec!["nazev_1".into(), "nazev_2".into(), "nazev_3".into()]),
        records,
        skipped: 0,
    }
}

fn bench_filter(c: &mut Criterion) {
    let dataset = synthetic_dataset(20_000);
    let selection = FilterSelection {
        region: RegionChoice::named(REGION_CENTERS[10].0),
        authorities: Picks::of(["obec", "kraj"]),
        types: Picks::of(["Základní škola"]),
    };

    c.bench_function("filter_20k", |b| {
        b.iter(|| filter(black_box(&dataset.records), black_box(&selection)))
    });

    c.bench_function("authority_options_20k", |b| {
        b.iter(|| authority_options(black_box(&dataset.records), black_box(&selection.region)))
    });
}

fn bench_render(c: &mut Criterion) {
    let dataset = synthetic_dataset(20_000);
    let catalog = CategoryIndex::build(&dataset);
    let renderer = MapRenderer::default();
    let viewport = ViewportState::default();
    let schools: Vec<&SchoolRecord> = dataset.records.iter().collect();

    c.bench_function("render_20k_markers", |b| {
        b.iter(|| renderer.render(black_box(&schools), &catalog, &viewport, false, None))
    });

    c.bench_function("category_index_20k", |b| {
        b.iter(|| CategoryIndex::build(black_box(&dataset)))
    });
}

criterion_group!(benches, bench_filter, bench_render);
criterion_main!(benches);
