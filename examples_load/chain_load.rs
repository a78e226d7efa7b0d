use std::io;
use std::time::Instant;

use kvlog::{AddTimeFilter, JsonFormatter, Logger, MergeFilter, Record, TimeFormat, record};

fn main() {
    let mut builder = Logger::builder();
    for stage in 0..16 {
        builder = builder.filter(MergeFilter::new([(format!("stage_{stage}"), stage)]));
    }
    builder = builder.filter(|record: &mut Record| {
        record.insert("pid", std::process::id());
    });
    let logger = builder
        .filter(AddTimeFilter::with_format(TimeFormat::Rfc3339))
        .formatter(JsonFormatter)
        .sink(io::sink())
        .build();

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger
            .submit(record! { "message" => "chain load test", "iteration" => i })
            .expect("io::sink never fails");
    }

    let elapsed = start.elapsed();
    println!("{} filters + json: rendered {} records in {:?} (~{:.0} rec/s)",
        logger.chain().len(),
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
