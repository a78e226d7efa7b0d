use std::io;
use std::time::Instant;

use kvlog::{LoggerConfig, record};

fn main() {
    let logger = LoggerConfig::console()
        .build_with_sink(io::sink())
        .expect("valid preset");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger
            .submit(record! { "message" => "default load test", "iteration" => i })
            .expect("io::sink never fails");
    }

    let elapsed = start.elapsed();
    println!("console preset: rendered {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
