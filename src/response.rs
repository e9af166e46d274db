//! Response helpers
//!
//! Builders for [`RunFunctionResponse`] values.

use crate::proto::{FunctionResult, ResponseMeta, RunFunctionRequest, RunFunctionResponse, Severity};
use std::time::Duration;

/// How long the orchestrator may cache a response before calling again
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Start a response to `req`: echoes the request tag and sets the ttl
pub fn to(req: &RunFunctionRequest, ttl: Duration) -> RunFunctionResponse {
    RunFunctionResponse {
        meta: Some(ResponseMeta {
            tag: req.tag().to_string(),
            ttl,
        }),
        desired: None,
        results: Vec::new(),
    }
}

/// Mark the invocation as failed
pub fn fatal(rsp: &mut RunFunctionResponse, err: impl std::fmt::Display) {
    push(rsp, Severity::SeverityFatal, err.to_string());
}

pub fn warning(rsp: &mut RunFunctionResponse, message: impl Into<String>) {
    push(rsp, Severity::SeverityWarning, message.into());
}

fn push(rsp: &mut RunFunctionResponse, severity: Severity, message: String) {
    rsp.results.push(FunctionResult { severity, message });
}
