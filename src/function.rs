//! XBuckets composition function
//!
//! Turns an observed `XBuckets` composite into one desired `Bucket` per logical
//! name. The function keeps no state between invocations; the only thing it
//! holds is the span its log events are recorded under.

use crate::error::DecodeError;
use crate::proto::{Resource, RunFunctionRequest, RunFunctionResponse, State};
use crate::resource::{Bucket, XBuckets};
use crate::response::{self, DEFAULT_TTL};
use std::collections::BTreeMap;
use tracing::Span;

/// The composition function
#[derive(Debug, Clone)]
pub struct Function {
    log: Span,
}

impl Function {
    /// Create a function that records its log events under `log`.
    ///
    /// Pass [`Span::none()`] to discard them.
    pub fn new(log: Span) -> Self {
        Self { log }
    }

    /// Derive the desired buckets for the observed composite.
    ///
    /// Fails only when the composite cannot be decoded, in which case nothing
    /// is produced. Duplicate logical names collapse into a single bucket and
    /// are reported as a warning result.
    pub fn transform(&self, req: &RunFunctionRequest) -> Result<RunFunctionResponse, DecodeError> {
        let _entered = self.log.enter();
        tracing::debug!(tag = req.tag(), "Running function");

        let xr = observed_xbuckets(req)?;
        let resources = compose_buckets(&xr);

        let mut rsp = response::to(req, DEFAULT_TTL);

        let duplicates = xr.duplicate_names();
        if !duplicates.is_empty() {
            tracing::warn!(
                xr_name = xr.name(),
                ?duplicates,
                "Duplicate bucket names collapse into one composed resource"
            );
            response::warning(
                &mut rsp,
                format!(
                    "spec.names contains duplicate bucket names: {}",
                    duplicates.join(", ")
                ),
            );
        }

        tracing::info!(
            xr_name = xr.name(),
            xr_kind = %xr.type_meta.kind,
            region = xr.region().unwrap_or(""),
            count = resources.len(),
            "Added desired buckets"
        );

        rsp.desired = Some(State {
            composite: None,
            resources,
        });
        Ok(rsp)
    }

    /// Protocol entry point: like [`Function::transform`], but a decode
    /// failure becomes a fatal result instead of an error.
    pub fn run_function(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        match self.transform(req) {
            Ok(rsp) => rsp,
            Err(err) => {
                let _entered = self.log.enter();
                tracing::error!(tag = req.tag(), error = %err, "Cannot compose buckets");

                let mut rsp = response::to(req, DEFAULT_TTL);
                response::fatal(&mut rsp, &err);
                rsp
            }
        }
    }
}

fn observed_xbuckets(req: &RunFunctionRequest) -> Result<XBuckets, DecodeError> {
    let composite = req
        .observed_composite()
        .ok_or(DecodeError::MissingComposite)?;
    XBuckets::from_document(&composite.resource)
}

/// One bucket per distinct logical name, keyed `<composite>-<logical>`
fn compose_buckets(xr: &XBuckets) -> BTreeMap<String, Resource> {
    let mut resources = BTreeMap::new();
    for name in &xr.spec.names {
        resources.entry(xr.composed_name(name)).or_insert_with(|| {
            let bucket = Bucket::for_logical_name(name, xr.region());
            Resource::from_document(bucket.to_document())
        });
    }
    resources
}
