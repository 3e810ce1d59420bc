use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use stocksieve::evaluate::Evaluator;
use stocksieve::logic::Logic;
use stocksieve::stock::Stock;

fn synthetic_stock(samples: u64) -> Stock {
    let heating = ["gas", "electric", "oil"];
    let vintages = ["1950s", "1960s", "1970s", "1980s", "1990s"];
    let ids: Vec<u64> = (1..=samples).collect();
    let columns = vec![
        (
            "heating_type".to_string(),
            (0..samples)
                .map(|i| Some(heating[(i % 3) as usize].to_string()))
                .collect(),
        ),
        (
            "vintage".to_string(),
            (0..samples)
                .map(|i| Some(vintages[(i % 5) as usize].to_string()))
                .collect(),
        ),
        (
            "state".to_string(),
            (0..samples).map(|i| Some(format!("S{}", i % 40))).collect(),
        ),
    ];
    Stock::new(ids, columns).unwrap()
}

fn reduce_benchmark(c: &mut Criterion) {
    let stock = synthetic_stock(100_000);
    let raw = json!({"or": [
        {"and": ["heating_type|gas", "vintage|1960s"]},
        {"and": ["heating_type|electric", {"not": "vintage|1950s"}]},
        {"and": ["heating_type|gas", "vintage|1960s"]},
        "state|S7",
    ]});
    let logic = Logic::parse(&raw).unwrap();

    c.bench_function("reduce cleared cache", |b| {
        let mut evaluator = Evaluator::new(&stock);
        b.iter(|| {
            evaluator.clear_cache();
            black_box(evaluator.evaluate(&logic).unwrap());
        })
    });

    c.bench_function("reduce primed cache", |b| {
        let mut evaluator = Evaluator::new(&stock);
        evaluator.evaluate(&logic).unwrap();
        b.iter(|| black_box(evaluator.evaluate(&logic).unwrap()))
    });
}

criterion_group!(benches, reduce_benchmark);
criterion_main!(benches);
