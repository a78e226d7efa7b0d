use kvlog::{Logger, record};

fn main() -> std::io::Result<()> {
    let logger = Logger::std();

    logger.print("service starting")?;
    logger.print_kv(["message", "listening", "addr", "0.0.0.0:8080"])?;
    logger.submit(record! {
        "message" => "request served",
        "status" => 200,
        "latency_ms" => 3.2,
        "path" => "/health",
    })?;

    // The trailing key has no value and is dropped.
    logger.print_kv(["message", "odd input", "orphan"])?;

    Ok(())
}
