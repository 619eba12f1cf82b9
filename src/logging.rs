use crate::errors::{DocketError, DocketResult};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts file logging. The handle must be kept alive for the whole run,
/// otherwise buffered records are dropped when it goes out of scope.
pub fn init_logging(level: &str) -> DocketResult<LoggerHandle> {
    let handle = Logger::try_with_str(level)
        .map_err(|e| DocketError::config_error(format!("invalid log level: {}", e)))?
        .log_to_file(FileSpec::default().basename("docket").suppress_timestamp())
        .append()
        .start()
        .map_err(|e| DocketError::config_error(format!("failed to start logger: {}", e)))?;

    log::info!("logging initialized at level '{}'", level);
    Ok(handle)
}
