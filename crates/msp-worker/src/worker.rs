//! The consume loop (§4.4). One message in, one response out, ack always —
//! a malformed payload or infeasible model is deterministic in its inputs,
//! so retrying it would just loop; the worker reports the failure and
//! moves on rather than nacking.

use amiquip::{ConsumerMessage, ConsumerOptions};
use serde_json::Value;

use crate::config::Config;
use crate::error::WorkerResult;
use crate::protocol::{Request, Response};
use crate::queue;

/// Runs the consume loop. When `once` is true, processes a single message
/// and returns (used by tests and the `--once` CLI flag).
pub fn run(config: &Config, once: bool) -> WorkerResult<()> {
    let mut connection = queue::connect(config)?;
    let channel = connection.open_channel(None)?;
    channel.qos(0, config.prefetch_count, false)?;

    let input_queue = queue::declare_durable(&channel, &config.input_queue)?;
    queue::declare_durable(&channel, &config.output_queue)?;

    let consumer = input_queue.consume(ConsumerOptions::default())?;
    tracing::info!(queue = %config.input_queue, "waiting for optimization requests");

    for message in consumer.receiver().iter() {
        match message {
            ConsumerMessage::Delivery(delivery) => {
                tracing::info!("received optimization request");
                let response = process_message(&delivery.body, config);

                match serde_json::to_vec(&response) {
                    Ok(payload) => {
                        if let Err(err) = queue::publish_persistent(&channel, &config.output_queue, &payload) {
                            tracing::error!(error = %err, "failed to publish response");
                        } else {
                            tracing::info!(queue = %config.output_queue, "response published");
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to serialize response"),
                }

                let delivery_tag = delivery.delivery_tag;
                consumer.ack(delivery)?;
                tracing::info!(delivery_tag, "request acknowledged");

                if once {
                    break;
                }
            }
            other => {
                tracing::warn!(?other, "consumer stream ended");
                break;
            }
        }
    }

    connection.close()?;
    Ok(())
}

fn process_message(body: &[u8], config: &Config) -> Response {
    let request: Request = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!(error = %err, "malformed request body");
            return Response::failure("unknown".to_string(), format!("malformed request: {err}"));
        }
    };

    if request.job_id.is_none() && request.request_id.is_none() {
        tracing::error!("request carries neither job_id nor request_id; rejecting before normalization");
        return Response::failure("unknown".to_string(), "request has no job_id or request_id".to_string());
    }

    let job_id = request.resolved_id();
    match solve_request(&request.data, config) {
        Ok(results) => Response::success(job_id, results),
        Err(err) => {
            tracing::error!(job_id = %job_id, error = %err, "request processing failed");
            Response::failure(job_id, err.to_string())
        }
    }
}

fn solve_request(data: &Value, config: &Config) -> anyhow::Result<Value> {
    let payload = msp_io::normalize_and_validate(data)?;
    if !payload.is_usable() {
        let mut issues: Vec<String> = payload
            .normalization
            .issues
            .iter()
            .chain(payload.validation.issues.iter())
            .map(|issue| issue.to_string())
            .collect();
        issues.dedup();
        return Err(anyhow::anyhow!("payload failed validation: {}", issues.join("; ")));
    }

    let solver_config = msp_algo::SolverConfig {
        time_limit_seconds: config.solver_timeout_seconds,
    };
    let result = msp_algo::solve_mission(&payload.mission, &solver_config)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_message_reports_malformed_json() {
        let config = Config {
            rabbitmq_host: "localhost".to_string(),
            rabbitmq_port: 5672,
            rabbitmq_user: "guest".to_string(),
            rabbitmq_pass: "guest".to_string(),
            input_queue: "optimization_requests".to_string(),
            output_queue: "optimization_responses".to_string(),
            prefetch_count: 1,
            solver_timeout_seconds: None,
        };
        let response = process_message(b"not json", &config);
        assert_eq!(response.status, "error");
        assert_eq!(response.job_id, "unknown");
    }

    #[test]
    fn test_process_message_reports_validation_failure() {
        let config = Config {
            rabbitmq_host: "localhost".to_string(),
            rabbitmq_port: 5672,
            rabbitmq_user: "guest".to_string(),
            rabbitmq_pass: "guest".to_string(),
            input_queue: "optimization_requests".to_string(),
            output_queue: "optimization_responses".to_string(),
            prefetch_count: 1,
            solver_timeout_seconds: None,
        };
        let body = serde_json::to_vec(&json!({
            "job_id": "job-1",
            "data": {},
        }))
        .unwrap();
        let response = process_message(&body, &config);
        assert_eq!(response.status, "error");
        assert_eq!(response.job_id, "job-1");
    }
}
