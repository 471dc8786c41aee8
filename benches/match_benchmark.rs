//! Benchmarks for the parse-once/match-many pattern.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kql::{parse, MapEvaluator, Value};
use std::collections::HashMap;

fn simple_record() -> HashMap<String, Value> {
	HashMap::from([("prop1".to_owned(), Value::from(42i64))])
}

fn nested_record() -> HashMap<String, Value> {
	let endpoints = Value::Array(vec![
		Value::from(HashMap::from([
			("host", Value::from("a.internal")),
			("port", Value::from(8080u32)),
		])),
		Value::from(HashMap::from([
			("host", Value::from("b.internal")),
			("port", Value::from(9090u32)),
		])),
	]);
	HashMap::from([
		("name".to_owned(), Value::from("service-a")),
		(
			"spec".to_owned(),
			Value::from(HashMap::from([("endpoints", endpoints)])),
		),
		("tags".to_owned(), Value::from(vec!["admin", "ops", "edge"])),
	])
}

fn benchmark_match(c: &mut Criterion) {
	let expression = parse("prop1:42").unwrap();
	let record = simple_record();
	let evaluator = MapEvaluator::new(&record);
	c.bench_function("match_flat_integer", |b| {
		b.iter(|| expression.matches(black_box(&evaluator)).unwrap())
	});

	let expression =
		parse("name:service* and (spec.endpoints:{port>9000} or tags:(ops and edge))").unwrap();
	let record = nested_record();
	let evaluator = MapEvaluator::new(&record);
	c.bench_function("match_nested_drilldown", |b| {
		b.iter(|| expression.matches(black_box(&evaluator)).unwrap())
	});
}

fn benchmark_parse(c: &mut Criterion) {
	let query = "a.b:c or b:2 and (c<=3 or d:{da:a or db:'b'}) or list:(1 or 2 or 3)";
	c.bench_function("parse_mixed_query", |b| b.iter(|| parse(black_box(query)).unwrap()));
}

criterion_group!(benches, benchmark_match, benchmark_parse);
criterion_main!(benches);
