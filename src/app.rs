use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{CsvSchemaValidator, UploadCheck};
use crate::domain::error::Result;
use crate::infrastructure::config::IntakeConfig;
use crate::interfaces::http::{add_log, start_server, HttpState, LogEntry};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Wire configuration, validator and HTTP state together.
pub fn build_state(config: &IntakeConfig, logs: Arc<Mutex<VecDeque<LogEntry>>>) -> Result<HttpState> {
    let registry = config.build_registry().map_err(|err| {
        error!(error = %err, "Failed to build schema registry");
        err
    })?;
    let reader = config.reader.header_reader()?;

    let validator = CsvSchemaValidator::new(Arc::new(registry));
    let schema_names: Vec<String> = validator
        .registry()
        .type_keys()
        .map(|k| k.to_string())
        .collect();
    add_log(
        &logs,
        "INFO",
        "System",
        &format!("Registered CSV schemas: {}", schema_names.join(", ")),
    );

    Ok(HttpState::new(UploadCheck::new(reader, validator), logs))
}

pub fn run() -> Result<()> {
    init_tracing();

    let config = IntakeConfig::load()?;
    let logs: Arc<Mutex<VecDeque<LogEntry>>> = Arc::new(Mutex::new(VecDeque::new()));
    let state = build_state(&config, logs.clone())?;

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(state, &config.server)?;
        info!(
            host = %config.server.host,
            port = config.server.port,
            "CSV intake HTTP server started"
        );
        add_log(
            &logs,
            "INFO",
            "System",
            &format!(
                "HTTP server started on {}:{}",
                config.server.host, config.server.port
            ),
        );
        server.await
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_uses_configured_schemas() {
        let mut config = IntakeConfig::default();
        config.schemas.reverse();

        let logs = Arc::new(Mutex::new(VecDeque::new()));
        let state = build_state(&config, logs.clone()).unwrap();

        let keys: Vec<String> = state
            .upload_check
            .validator()
            .registry()
            .type_keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["yard", "shipment"]);
        assert!(logs.lock().unwrap()[0].message.contains("yard, shipment"));
    }

    #[test]
    fn test_build_state_rejects_bad_delimiter() {
        let mut config = IntakeConfig::default();
        config.reader.delimiter = "||".to_string();

        let result = build_state(&config, Arc::new(Mutex::new(VecDeque::new())));
        assert!(result.is_err());
    }
}
