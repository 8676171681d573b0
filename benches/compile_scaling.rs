//! Compilation scaling benchmarks.
//!
//! Measures rule-to-graph compilation time from small rule files up to
//! several thousand rules, with a realistic mix of actions and shared
//! output interfaces.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use firewall_compiler::parser::parse_rules;
use firewall_compiler::{
    Action, GraphCompiler, HeaderField, HeaderMatch, Priority, Rule, SegmentResolver,
    TrafficSource,
};

fn generate_rules(count: usize) -> Vec<Rule> {
    (0..count)
        .map(|i| {
            let header_match = HeaderMatch::new()
                .with(HeaderField::Ipv4Proto, "6")
                .with(HeaderField::TcpDst, (1024 + i % 4096).to_string());
            let actions = match i % 4 {
                0 => vec![Action::Drop],
                1 => vec![
                    Action::Log(format!("rule {i}")),
                    Action::Output(format!("eth{}", i % 8)),
                ],
                2 => vec![
                    Action::Alert(format!("suspicious {i}")),
                    Action::Log(format!("rule {i}")),
                    Action::Drop,
                ],
                _ => vec![Action::Output(format!("eth{}", i % 8))],
            };
            let priority = if i % 10 == 0 {
                Priority::High
            } else {
                Priority::Medium
            };
            Rule::new(header_match, priority, actions)
        })
        .collect()
}

fn bench_compile_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_scaling");
    let compiler = GraphCompiler::new(TrafficSource::Device {
        interface: "eth0".to_string(),
    });

    for count in [10usize, 100, 1_000, 5_000] {
        let rules = generate_rules(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rules, |b, rules| {
            b.iter(|| {
                let statement = compiler.compile(black_box(rules), 220, &SegmentResolver);
                black_box(statement)
            })
        });
    }

    group.finish();
}

fn bench_parse_and_compile(c: &mut Criterion) {
    let mut yaml = String::from("rules:\n");
    for i in 0..500 {
        yaml.push_str(&format!(
            "  - match: {{ udp_dst: \"{}\" }}\n    actions:\n      - {{ type: log, message: \"dns {}\" }}\n      - {{ type: output, interface: eth{} }}\n",
            i,
            i,
            i % 4
        ));
    }

    let compiler = GraphCompiler::new(TrafficSource::Dump {
        file_path: "in_dump.pcap".to_string(),
    });

    c.bench_function("parse_and_compile_500", |b| {
        b.iter(|| {
            let rules = parse_rules(black_box(&yaml)).unwrap();
            black_box(compiler.compile_graph(&rules))
        })
    });
}

criterion_group!(benches, bench_compile_scaling, bench_parse_and_compile);
criterion_main!(benches);
