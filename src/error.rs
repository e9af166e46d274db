//! Function Errors
//!
//! The function has exactly one failure mode: the observed composite cannot be
//! decoded into the shape it expects. The variants say which part was wrong.

/// Failure to decode the observed composite resource.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("cannot get observed composite resource: request has no observed composite")]
    MissingComposite,
    #[error("cannot decode {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot decode composite metadata: metadata.name must not be empty")]
    EmptyName,
}

impl DecodeError {
    pub(crate) fn malformed(what: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { what, source }
    }
}
