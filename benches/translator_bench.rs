use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use stix_dispatcher::ast::{Comparator, Expression, ObservationOperator};
use stix_dispatcher::statement::build_select;
use stix_dispatcher::{MappingConfig, PatternTranslator};

const QUALIFIER: &str = "START t'2020-01-01T00:00:00Z' STOP t'2020-01-02T00:00:00Z'";

// 基准测试使用的模式
fn test_cases() -> Vec<(&'static str, Expression)> {
    let simple = Expression::comparison("file:name", Comparator::Equal, "a.exe").observe();

    let fan_out = Expression::comparison("ipv4-addr:value", Comparator::Equal, "10.0.0.1")
        .or(Expression::comparison("network-traffic:src_ref.value", Comparator::Equal, "fe80::1"))
        .observe();

    let qualified = Expression::comparison("file:name", Comparator::Matches, "^cmd")
        .and(Expression::comparison("network-traffic:src_port", Comparator::In, vec![80i64, 443, 8080]))
        .observe()
        .combine(
            ObservationOperator::Or,
            Expression::comparison("network-traffic:start", Comparator::GreaterThan, "2020-01-01T00:00:00Z").observe(),
        )
        .qualify(QUALIFIER);

    vec![("simple", simple), ("fan_out", fan_out), ("qualified", qualified)]
}

// 基准测试：模式翻译性能
fn benchmark_translator(c: &mut Criterion) {
    let translator = PatternTranslator::new(MappingConfig::sample());
    let mut group = c.benchmark_group("translator_performance");

    for (name, pattern) in test_cases() {
        group.bench_with_input(BenchmarkId::new("translate", name), &pattern, |b, pattern| {
            b.iter(|| match translator.translate(black_box(pattern)) {
                Ok(predicate) => black_box(predicate),
                Err(_) => panic!("翻译失败"),
            })
        });
    }

    group.finish();
}

// 基准测试：翻译加生成完整语句
fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end_performance");

    for (name, pattern) in test_cases() {
        group.bench_with_input(BenchmarkId::new("full_pipeline", name), &pattern, |b, pattern| {
            b.iter(|| {
                let translator = PatternTranslator::new(MappingConfig::sample());
                let predicate = translator.translate(black_box(pattern)).expect("翻译应该成功");
                black_box(build_select("events", &predicate))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_translator, benchmark_end_to_end);
criterion_main!(benches);
