use user_soap::logger::*;
use user_soap::settings::LogFormat;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "debug".to_string(),
        format: LogFormat::Compact,
        ansi: false,
    };
    logger.reload_from_config(&config)?;
    trace!("application trace log");
    debug!(username = "alice", "application debug log");
    info!("application info log");

    // An invalid directive is reported, the previous filter stays active
    let bad = LogConfig {
        filter: "user_soap=loud".to_string(),
        format: LogFormat::Text,
        ansi: true,
    };
    println!("Invalid filter rejected: {}", logger.reload_from_config(&bad).is_err());
    debug!("still at debug");

    Ok(())
}
