//! XBuckets composition function
//!
//! Derives one S3 `Bucket` composed resource per logical name declared on an
//! `XBuckets` composite resource.
//!
//! # Module Structure
//!
//! - [`function`] - The transformation and its protocol entry point
//! - [`resource`] - Typed composite and composed resource records
//! - [`proto`] - Request/response envelope types
//! - [`response`] - Response builders and the default ttl
//! - [`transport`] - One-shot and TCP request delivery
//! - [`config`] - Persisted runner defaults
//!
//! # Example
//!
//! ```ignore
//! use function_xbuckets::{Function, RunFunctionRequest};
//!
//! let f = Function::new(tracing::Span::none());
//! let rsp = f.transform(&req)?;
//! for (name, bucket) in rsp.desired_resources().unwrap() {
//!     println!("{name}: {:?}", bucket.resource);
//! }
//! ```

pub mod config;
pub mod error;
pub mod function;
pub mod proto;
pub mod resource;
pub mod response;
pub mod transport;

pub use error::DecodeError;
pub use function::Function;
pub use proto::{RunFunctionRequest, RunFunctionResponse};
