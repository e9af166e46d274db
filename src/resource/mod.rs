//! Resource model
//!
//! Typed views of the documents the function reads and writes.
//!
//! # Architecture
//!
//! - [`composite`] - Decodes the observed `XBuckets` composite at the input boundary
//! - [`composed`] - Builds the `Bucket` descriptors and encodes them at the output boundary
//!
//! Everything between those two boundaries works on the typed records; generic
//! documents never leak into the transformation itself.

pub mod composed;
pub mod composite;

pub use composed::{Bucket, BUCKET_API_VERSION, BUCKET_KIND, EXTERNAL_NAME_ANNOTATION};
pub use composite::{ObjectMeta, TypeMeta, XBuckets, XBucketsSpec};
