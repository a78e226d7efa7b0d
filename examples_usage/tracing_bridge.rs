use std::sync::Arc;

use kvlog::init::init_tracing;
use kvlog::{ConsoleFormatter, AddTimeFilter, Logger};
use tracing::{error, info};

fn main() {
    let logger = Logger::builder()
        .filter(AddTimeFilter::new())
        .formatter(
            ConsoleFormatter::new()
                .print_time(true)
                .print_keys(true)
                .sort_keys(true),
        )
        .build();
    init_tracing(Arc::new(logger)).expect("no other global subscriber");

    info!("starting service");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );
}
