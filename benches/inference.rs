//! Benchmarks for model compilation and evaluation cycles.

use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use fribe::config::EngineConfig;
use fribe::engine::Engine;
use fribe::loader::{Grammars, compile, load_engine_from_str};

const MODEL: &str = r#"
universe "distance" description "meters to the target"
    "near" 0 0
    "mid" 10 0.5
    "far" 50 1
end
universe "speed"
    "stopped" 0 0
    "slow" 1 0.3
    "fast" 5 1
end
universe "throttle"
    "off" 0 0
    "half" 0.5 0.5
    "full" 1 1
end
rulebase "throttle"
    rule "full" when "distance" is "far" and "speed" is "stopped" end
    rule "half" when "distance" is "mid" end
    rule "half" when "distance" is "far" and "speed" is "slow" end
    rule "off" when "distance" is "near" end
    rule "off" when "speed" is "fast" end
end
"#;

fn engine() -> Engine {
    load_engine_from_str(MODEL).unwrap()
}

fn bench_compile(c: &mut Criterion) {
    let grammars = Grammars::builtin().unwrap();
    c.bench_function("compile_model", |bench| {
        bench.iter(|| black_box(compile(MODEL, &grammars, EngineConfig::default()).unwrap()))
    });
}

fn bench_cycle(c: &mut Criterion) {
    let mut engine = engine();
    let observations = HashMap::from([("distance".to_string(), 23.0), ("speed".to_string(), 0.7)]);
    c.bench_function("calc_consequences", |bench| {
        bench.iter(|| {
            engine.calc_consequences(&observations).unwrap();
            black_box(engine.get_state("throttle").unwrap())
        })
    });
}

criterion_group!(benches, bench_compile, bench_cycle);
criterion_main!(benches);
