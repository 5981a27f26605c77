use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use probescript_syntax::{
    drivers::SimSpi, execution::ExecutionContext, Compiler, Engine, Formatter, PinRegistry,
    Session, SessionConfig, SimulatedBoard,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SCRIPT_LENGTHS: [usize; 3] = [10, 100, 500];

/// Random bus traffic: framing, literals in every radix and repeated reads.
fn random_script(rng: &mut StdRng, tokens: usize) -> String {
    (0..tokens)
        .map(|_| match rng.random_range(0..6) {
            0 => "[".to_string(),
            1 => "]".to_string(),
            2 => format!("0x{:02x}", rng.random_range(0..=u8::MAX)),
            3 => format!("0b{:b}", rng.random_range(0..16u8)),
            4 => format!("{}", rng.random_range(0..=u8::MAX)),
            _ => "r".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compile");
    let config = SessionConfig::default();
    let pins = PinRegistry::new(config.pin_count);

    for &n in &SCRIPT_LENGTHS {
        let script = random_script(&mut StdRng::seed_from_u64(42), n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &script, |b, script| {
            b.iter(|| Compiler::new(&config, &pins).compile_str(script).unwrap())
        });
    }

    group.finish();
}

fn bench_run_and_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("Run and format");
    let config = SessionConfig::default();

    for &n in &SCRIPT_LENGTHS {
        let mut pins = PinRegistry::new(config.pin_count);
        let script = random_script(&mut StdRng::seed_from_u64(123), n);
        let program = Compiler::new(&config, &pins).compile_str(&script).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter_batched(
                || (SimSpi::new(), SimulatedBoard::new(config.pin_count)),
                |(mut driver, mut board)| {
                    let mut ctx = ExecutionContext::new(&mut driver, &mut board, &mut pins);
                    let trace = Engine::new(config.capacity).run(program, &mut ctx);
                    Formatter::new(&config).format(&trace)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    let mut driver = SimSpi::new();
    let mut board = SimulatedBoard::new(8);

    c.bench_function("Session line", |b| {
        b.iter(|| {
            session
                .run_line("{0x9f r:3} [0x03 0x00 0x00 0x00 r:16]", &mut driver, &mut board)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_compile, bench_run_and_format, bench_session);
criterion_main!(benches);
