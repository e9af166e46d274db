//! Composed Bucket resource
//!
//! The descriptor the function emits for every logical bucket name.

use serde_json::{json, Map, Value};

/// API version of the managed bucket resource
pub const BUCKET_API_VERSION: &str = "s3.aws.upbound.io/v1beta1";
/// Kind of the managed bucket resource
pub const BUCKET_KIND: &str = "Bucket";
/// Annotation the provider uses to identify the real-world object
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Desired S3 bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub external_name: String,
    pub region: Option<String>,
}

impl Bucket {
    /// Bucket identified externally by `name`, created in `region`
    pub fn for_logical_name(name: &str, region: Option<&str>) -> Self {
        Self {
            external_name: name.to_string(),
            region: region.map(str::to_string),
        }
    }

    /// Encode to the generic document shape the provider understands
    pub fn to_document(&self) -> Value {
        let mut for_provider = Map::new();
        if let Some(region) = &self.region {
            for_provider.insert("region".to_string(), Value::String(region.clone()));
        }

        json!({
            "apiVersion": BUCKET_API_VERSION,
            "kind": BUCKET_KIND,
            "metadata": {
                "annotations": {
                    EXTERNAL_NAME_ANNOTATION: self.external_name,
                }
            },
            "spec": {
                "forProvider": for_provider,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let bucket = Bucket::for_logical_name("test-bucket-a", Some("us-east-2"));
        assert_eq!(
            bucket.to_document(),
            json!({
                "apiVersion": "s3.aws.upbound.io/v1beta1",
                "kind": "Bucket",
                "metadata": {
                    "annotations": {
                        "crossplane.io/external-name": "test-bucket-a"
                    }
                },
                "spec": {
                    "forProvider": {
                        "region": "us-east-2"
                    }
                }
            })
        );
    }

    #[test]
    fn test_region_is_omitted_when_absent() {
        let doc = Bucket::for_logical_name("b", None).to_document();
        assert_eq!(doc["spec"]["forProvider"], json!({}));
    }

    #[test]
    fn test_region_is_copied_verbatim() {
        let doc = Bucket::for_logical_name("b", Some("  EU-West-1 ")).to_document();
        assert_eq!(doc["spec"]["forProvider"]["region"], "  EU-West-1 ");
    }
}
