use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Checks that every numeric bound is usable and that the identifying
/// fields are present. Returns the first problem found.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let crawler = &config.crawler;

    if crawler.max_queue_size == 0 {
        return Err(ConfigError::Validation(
            "crawler.max_queue_size must be greater than 0".to_string(),
        ));
    }

    if crawler.max_connections == 0 {
        return Err(ConfigError::Validation(
            "crawler.max_connections must be greater than 0".to_string(),
        ));
    }

    if crawler.timeout == 0 {
        return Err(ConfigError::Validation(
            "crawler.timeout must be greater than 0".to_string(),
        ));
    }

    if crawler.max_threads == 0 {
        return Err(ConfigError::Validation(
            "crawler.max_threads must be greater than 0".to_string(),
        ));
    }

    if crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max_pages must be greater than 0".to_string(),
        ));
    }

    if crawler.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler.user_agent must not be empty".to_string(),
        ));
    }

    if crawler.empty_poll_limit == 0 {
        return Err(ConfigError::Validation(
            "crawler.empty_poll_limit must be greater than 0".to_string(),
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.database_path must not be empty".to_string(),
        ));
    }

    if config.index.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "index.path must not be empty".to_string(),
        ));
    }

    if config.search.port == 0 {
        return Err(ConfigError::Validation(
            "search.port must not be 0".to_string(),
        ));
    }

    if config.search.snippet_length == 0 {
        return Err(ConfigError::Validation(
            "search.snippet_length must be greater than 0".to_string(),
        ));
    }

    if config.search.overfetch_factor == 0 {
        return Err(ConfigError::Validation(
            "search.overfetch_factor must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{CrawlerConfig, IndexConfig, SearchConfig, StorageConfig};

    fn valid_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                max_queue_size: 1000,
                max_connections: 10,
                timeout: 30,
                max_threads: 4,
                max_pages: 100,
                delay_ms: 1000,
                user_agent: "testbot/1.0".to_string(),
                empty_poll_limit: 5,
                backoff_ms: 500,
                robots_ttl_secs: 86_400,
            },
            storage: StorageConfig {
                database_path: "./test.db".to_string(),
            },
            index: IndexConfig {
                path: "./test.idx".to_string(),
            },
            search: SearchConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_queue_size_rejected() {
        let mut config = valid_config();
        config.crawler.max_queue_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let mut config = valid_config();
        config.crawler.max_connections = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut config = valid_config();
        config.crawler.max_threads = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_pages_rejected() {
        let mut config = valid_config();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.crawler.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = valid_config();
        config.storage.database_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = valid_config();
        config.search.port = 0;
        assert!(validate(&config).is_err());
    }
}
