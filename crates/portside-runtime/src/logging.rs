//! Logging for a loaded configuration.

use portside_telemetry::TelemetryConfig;

use crate::config::RuntimeConfig;
use crate::errors::RuntimeError;

/// Install the global subscriber from `PORTSIDE_*` logging variables with
/// the `[logging]` section of `config` on top.
pub fn init_logging(config: &RuntimeConfig) -> Result<(), RuntimeError> {
    init_logging_over(config, TelemetryConfig::from_env())
}

/// Same as [`init_logging`] over an explicit base.
pub fn init_logging_over(
    config: &RuntimeConfig,
    base: TelemetryConfig,
) -> Result<(), RuntimeError> {
    let telemetry = config.telemetry_config(base);
    portside_telemetry::init_logging(&telemetry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portside_telemetry::TelemetryError;

    #[test]
    fn test_logging_section_level_is_applied() {
        let config = RuntimeConfig::parse("[logging]\nlevel = \"debug,ps_04=verbose\"\n").unwrap();
        let err = init_logging_over(&config, TelemetryConfig::default()).unwrap_err();
        match err {
            RuntimeError::Telemetry(TelemetryError::Filter { filter, .. }) => {
                assert_eq!(filter, "debug,ps_04=verbose");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_init_then_reinit() {
        let config = RuntimeConfig::parse("[logging]\nlevel = \"warn\"\njson = true\n").unwrap();
        assert!(init_logging_over(&config, TelemetryConfig::default()).is_ok());
        assert!(matches!(
            init_logging_over(&config, TelemetryConfig::default()),
            Err(RuntimeError::Telemetry(TelemetryError::AlreadyInitialized(_)))
        ));
    }
}
