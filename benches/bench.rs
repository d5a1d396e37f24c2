use criterion::{criterion_group, criterion_main, Criterion};
use fyaml::{Document, Emitter, Parser};

static VERY_LARGE_YAML: &[u8] = include_bytes!("very_large.yml");

pub fn parser(c: &mut Criterion) {
    c.bench_function("fyaml parse large", |b| {
        b.iter(|| {
            let mut input = VERY_LARGE_YAML;
            let mut parser = Parser::new();
            parser.set_input_string(&mut input);
            Document::load(&mut parser)
        })
    });

    c.bench_function("fyaml emit large", |b| {
        // output shouldn't be much larger than the input, but just to be safe...
        let mut buffer = Vec::with_capacity(VERY_LARGE_YAML.len());

        let doc = {
            let mut parser = Parser::new();
            let mut input = VERY_LARGE_YAML;
            parser.set_input_string(&mut input);
            Document::load(&mut parser).unwrap()
        };

        b.iter_custom(|iters| {
            let mut measurement = std::time::Duration::ZERO;
            for _ in 0..iters {
                buffer.clear();
                let start_time = std::time::Instant::now();
                let mut emitter = Emitter::new();
                emitter.set_output(&mut buffer);
                doc.dump(&mut emitter).unwrap();
                measurement += start_time.elapsed();
            }
            measurement
        });
    });
}

criterion_group!(benches, parser);
criterion_main!(benches);
