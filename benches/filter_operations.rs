//! Benchmarks for filter compilation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use criba_query::compiler::conjunction::compile_and_texts;
use criba_query::compiler::range::compile_ranges;
use criba_query::compiler::set::compile_in;
use criba_query::{
    ColumnMap, CompilerOptions, EqualityFilter, FilterCompiler, FilterMap, FilterRequest,
    FilterValue, RangeFilter, RenderMode,
};
use serde_json::json;

fn equality_filters(count: usize) -> FilterMap<EqualityFilter> {
    (0..count)
        .map(|i| (format!("t.field_{}", i), EqualityFilter::new(format!("value_{}", i))))
        .collect()
}

fn range_filters(count: usize) -> FilterMap<RangeFilter> {
    (0..count)
        .map(|i| (format!("t.range_{}", i), RangeFilter::new(i as i64, (i * 10) as i64)))
        .collect()
}

fn sample_request() -> FilterRequest {
    FilterRequest::from_value(json!({
        "filtro": {"f.status": "activa", "f.serie": {"value": "A", "operador": "OR"}},
        "filtro_especial": [
            {"f.total": {"operador": ">", "valor": 1000}},
            {"f.vence": {"operador": "<=", "valor": "f.pago", "valor_es_campo": true, "comparacion": "OR"}}
        ],
        "filtro_rango": {"f.fecha": {"valor1": "2024-01-01", "valor2": "2024-01-31"}},
        "in": {"llave": "f.cliente_id", "values": [1, 2, 3, 4, 5]},
        "not_in": {"llave": "f.id", "values": [9]},
        "diferente_de": {"f.tipo": "nota"},
        "filtro_fecha": [{"campo_1": "p.inicio", "campo_2": "p.fin", "fecha": "2024-01-15"}]
    }))
    .unwrap_or_default()
}

fn bench_category_compilers(c: &mut Criterion) {
    let mut group = c.benchmark_group("category_compilers");
    let columns = ColumnMap::new();

    for count in [1, 10, 100] {
        let filters = equality_filters(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("and_texts", count), &filters, |b, filters| {
            b.iter(|| black_box(compile_and_texts(filters, &columns)))
        });

        let ranges = range_filters(count);
        group.bench_with_input(BenchmarkId::new("ranges", count), &ranges, |b, ranges| {
            b.iter(|| black_box(compile_ranges(ranges)))
        });

        let values: Vec<FilterValue> = (0..count as i64).map(FilterValue::Int).collect();
        group.bench_with_input(BenchmarkId::new("in", count), &values, |b, values| {
            b.iter(|| black_box(compile_in("t.id", values)))
        });
    }

    group.finish();
}

fn bench_request_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_compilation");
    let request = sample_request();

    let literal = FilterCompiler::default();
    group.bench_function("literal", |b| b.iter(|| black_box(literal.compile(&request))));

    let placeholder = FilterCompiler::new(CompilerOptions {
        render: RenderMode::Placeholder,
        ..Default::default()
    });
    group.bench_function("placeholder", |b| {
        b.iter(|| black_box(placeholder.compile(&request)))
    });

    group.bench_function("parse_and_compile", |b| {
        let raw = serde_json::to_string(&request).unwrap_or_default();
        b.iter(|| {
            let request = FilterRequest::from_json(black_box(&raw));
            black_box(request.and_then(|r| literal.compile(&r)))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_category_compilers, bench_request_compilation);
criterion_main!(benches);
