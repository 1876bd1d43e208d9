//! Startup logging.

use tracing::info;
use userbase_config::AppConfig;

/// Logs where the server can be reached and what it is backed by.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.rest_addr();
    info!("{}", separator);
    info!("{} v{} ({})", config.app.name, config.app.version, config.app.environment);
    info!("Storage:   {}", config.storage.backend);
    info!("Users API: http://{}/api/v1/users", addr);
    info!("Health:    http://{}/health", addr);
    if config.server.swagger_enabled {
        info!("API Docs:  http://{}/swagger-ui", addr);
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default());
    }

    #[test]
    fn test_print_startup_info_without_swagger() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.server.swagger_enabled = false;
        print_startup_info(&config);
    }
}
