//! Wire schema for the request/response pair described in §6. Incoming
//! messages carry `job_id` and/or `request_id`; `job_id` is preferred when
//! both are present, matching the source worker's id resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Request {
    /// `job_id` if present, else `request_id`, else `"unknown"`.
    pub fn resolved_id(&self) -> String {
        self.job_id
            .clone()
            .or_else(|| self.request_id.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub job_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(job_id: String, results: Value) -> Self {
        Response {
            job_id,
            status: "success",
            results: Some(results),
            error: None,
        }
    }

    pub fn failure(job_id: String, error: String) -> Self {
        Response {
            job_id,
            status: "error",
            results: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_id_prefers_job_id() {
        let request = Request {
            job_id: Some("job-1".to_string()),
            request_id: Some("req-1".to_string()),
            data: Value::Null,
        };
        assert_eq!(request.resolved_id(), "job-1");
    }

    #[test]
    fn test_resolved_id_falls_back_to_request_id() {
        let request = Request {
            job_id: None,
            request_id: Some("req-1".to_string()),
            data: Value::Null,
        };
        assert_eq!(request.resolved_id(), "req-1");
    }

    #[test]
    fn test_resolved_id_defaults_to_unknown() {
        let request = Request {
            job_id: None,
            request_id: None,
            data: Value::Null,
        };
        assert_eq!(request.resolved_id(), "unknown");
    }

    #[test]
    fn test_failure_response_omits_results() {
        let response = Response::failure("job-1".to_string(), "boom".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("results").is_none());
        assert_eq!(json["error"], "boom");
    }
}
