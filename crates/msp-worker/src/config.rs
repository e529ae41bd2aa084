//! Environment-variable configuration, matching the source `Config` class's
//! defaults exactly: `guest`/`guest` credentials and the two named queues.

use crate::error::{WorkerError, WorkerResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub rabbitmq_host: String,
    pub rabbitmq_port: u16,
    pub rabbitmq_user: String,
    pub rabbitmq_pass: String,
    pub input_queue: String,
    pub output_queue: String,
    pub prefetch_count: u16,
    pub solver_timeout_seconds: Option<f64>,
}

impl Config {
    pub fn from_env() -> WorkerResult<Self> {
        let rabbitmq_port = match std::env::var("RABBITMQ_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| WorkerError::Config(format!("RABBITMQ_PORT is not a valid port: {value}")))?,
            Err(_) => 5672,
        };
        let prefetch_count = match std::env::var("PREFETCH_COUNT") {
            Ok(value) => value
                .parse()
                .map_err(|_| WorkerError::Config(format!("PREFETCH_COUNT is not a valid count: {value}")))?,
            Err(_) => 1,
        };
        let solver_timeout_seconds = match std::env::var("SOLVER_TIMEOUT") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|_| WorkerError::Config(format!("SOLVER_TIMEOUT is not a number: {value}")))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            rabbitmq_host: std::env::var("RABBITMQ_HOST").unwrap_or_else(|_| "localhost".to_string()),
            rabbitmq_port,
            rabbitmq_user: std::env::var("RABBITMQ_USER").unwrap_or_else(|_| "guest".to_string()),
            rabbitmq_pass: std::env::var("RABBITMQ_PASS").unwrap_or_else(|_| "guest".to_string()),
            input_queue: std::env::var("INPUT_QUEUE").unwrap_or_else(|_| "optimization_requests".to_string()),
            output_queue: std::env::var("OUTPUT_QUEUE").unwrap_or_else(|_| "optimization_responses".to_string()),
            prefetch_count,
            solver_timeout_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        for key in ["RABBITMQ_HOST", "RABBITMQ_PORT", "RABBITMQ_USER", "RABBITMQ_PASS", "INPUT_QUEUE", "OUTPUT_QUEUE", "PREFETCH_COUNT", "SOLVER_TIMEOUT"] {
            std::env::remove_var(key);
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.rabbitmq_port, 5672);
        assert_eq!(config.rabbitmq_user, "guest");
        assert_eq!(config.rabbitmq_pass, "guest");
        assert_eq!(config.input_queue, "optimization_requests");
        assert_eq!(config.output_queue, "optimization_responses");
        assert_eq!(config.prefetch_count, 1);
        assert!(config.solver_timeout_seconds.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("RABBITMQ_PORT", "not-a-port");
        let result = Config::from_env();
        std::env::remove_var("RABBITMQ_PORT");
        assert!(result.is_err());
    }
}
