use kvlog::{LoggerConfig, MergeFilter, record};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // KVLOG_FORMAT, KVLOG_TIME_FORMAT, ... override the preset when set.
    let mut logger = LoggerConfig::from_env_with(|key| match key {
        kvlog::config::KVLOG_FORMAT_ENV => Some("json".to_string()),
        _ => std::env::var(key).ok(),
    })?
    .build()?;
    logger.add_filter(MergeFilter::new([("service", "billing"), ("region", "eu-west-1")]));

    logger.submit(record! {
        "message" => "invoice created",
        "invoice_id" => 1042u64,
        "lines" => serde_json::json!([{"sku": "A-1", "qty": 2}]),
    })?;
    logger.submit(record! { "message" => "region override", "region" => "us-east-1" })?;

    Ok(())
}
