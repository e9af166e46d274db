//! Function Protocol Types
//!
//! Serde model of the request and response envelopes exchanged with the
//! orchestrator. Field names follow the protobuf JSON mapping (camelCase keys,
//! enum values as upper-case strings, durations as `"<seconds>s"`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// A request to run the function once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFunctionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RequestMeta>,
    /// State observed by the orchestrator before the pipeline ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<State>,
    /// State desired by earlier functions in the pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<State>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl RunFunctionRequest {
    /// The observed composite resource, if the request carries one
    pub fn observed_composite(&self) -> Option<&Resource> {
        self.observed.as_ref()?.composite.as_ref()
    }

    /// Tag identifying this request, used for log correlation
    pub fn tag(&self) -> &str {
        self.meta.as_ref().map(|m| m.tag.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

/// Observed or desired state of a composite and its composed resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Resource>,
}

/// A resource document plus protocol-level annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub resource: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<Ready>,
}

impl Resource {
    /// Wrap a generic document. Non-object documents yield an empty resource.
    pub fn from_document(document: Value) -> Self {
        let resource = match document {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            resource,
            ready: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ready {
    ReadyUnspecified,
    ReadyTrue,
    ReadyFalse,
}

/// The function's answer to a [`RunFunctionRequest`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<State>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FunctionResult>,
}

impl RunFunctionResponse {
    /// Desired composed resources, if the response carries desired state
    pub fn desired_resources(&self) -> Option<&BTreeMap<String, Resource>> {
        self.desired.as_ref().map(|d| &d.resources)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.meta.as_ref().map(|m| m.ttl)
    }

    /// True if any result is fatal
    pub fn is_fatal(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.severity == Severity::SeverityFatal)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// How long the orchestrator may cache this response
    #[serde(with = "duration_str")]
    pub ttl: Duration,
}

/// A message for the orchestrator about this invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    SeverityUnspecified,
    SeverityFatal,
    SeverityWarning,
    SeverityNormal,
}

/// Durations in protobuf JSON form: decimal seconds with an `s` suffix
mod duration_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let text = if ttl.subsec_nanos() == 0 {
            format!("{}s", ttl.as_secs())
        } else {
            format!("{}s", ttl.as_secs_f64())
        };
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        let Some(seconds) = text.strip_suffix('s') else {
            return Err(D::Error::custom(format!("duration {text:?} has no 's' suffix")));
        };
        let seconds: f64 = seconds
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid duration {text:?}: {e}")))?;
        Duration::try_from_secs_f64(seconds)
            .map_err(|e| D::Error::custom(format!("invalid duration {text:?}: {e}")))
    }
}
