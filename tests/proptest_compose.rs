//! Property-based tests using proptest
//!
//! These tests verify the key set, field mapping and idempotence of the
//! function over randomized composites.

use function_xbuckets::resource::EXTERNAL_NAME_ANNOTATION;
use function_xbuckets::{Function, RunFunctionRequest};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::Span;

/// Generate an arbitrary XBuckets request
fn arb_request() -> impl Strategy<Value = (String, String, Vec<String>, RunFunctionRequest)> {
    (
        "[a-z][a-z0-9-]{0,20}", // composite name
        prop_oneof![
            Just("us-east-2".to_string()),
            Just("eu-west-1".to_string()),
            Just(String::new()),
            ".{0,12}",
        ],
        // small alphabet so duplicates show up
        prop::collection::vec("[a-c]{1,2}", 0..12),
    )
        .prop_map(|(name, region, names)| {
            let req = serde_json::from_value(json!({
                "observed": {"composite": {"resource": {
                    "apiVersion": "example.crossplane.io/v1alpha1",
                    "kind": "XBuckets",
                    "metadata": {"name": name},
                    "spec": {"region": region, "names": names}
                }}}
            }))
            .unwrap();
            (name, region, names, req)
        })
}

proptest! {
    /// One entry per distinct logical name, keyed `<composite>-<logical>`
    #[test]
    fn keys_match_distinct_names((name, _region, names, req) in arb_request()) {
        let f = Function::new(Span::none());
        let rsp = f.transform(&req).unwrap();

        let got: BTreeSet<String> = rsp.desired_resources().unwrap().keys().cloned().collect();
        let want: BTreeSet<String> = names.iter().map(|n| format!("{name}-{n}")).collect();
        prop_assert_eq!(got, want);
    }

    /// Region and external name are copied verbatim
    #[test]
    fn fields_are_copied_verbatim((name, region, _names, req) in arb_request()) {
        let f = Function::new(Span::none());
        let rsp = f.transform(&req).unwrap();

        for (key, resource) in rsp.desired_resources().unwrap() {
            let doc = &resource.resource;
            prop_assert_eq!(doc["spec"]["forProvider"]["region"].as_str(), Some(region.as_str()));

            let external = doc["metadata"]["annotations"][EXTERNAL_NAME_ANNOTATION].as_str().unwrap();
            prop_assert_eq!(key, &format!("{name}-{external}"));
        }
    }

    /// Running twice gives identical output
    #[test]
    fn transform_is_idempotent((_name, _region, _names, req) in arb_request()) {
        let f = Function::new(Span::none());
        let first = f.transform(&req).unwrap();
        let second = f.transform(&req).unwrap();

        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    /// The ttl is always 60 seconds, whatever the input
    #[test]
    fn ttl_is_always_sixty_seconds((_name, _region, _names, req) in arb_request()) {
        let f = Function::new(Span::none());
        prop_assert_eq!(f.run_function(&req).ttl(), Some(Duration::from_secs(60)));
    }

    /// Non-sequence names never produce desired resources
    #[test]
    fn scalar_names_are_rejected(scalar in prop_oneof![
        "[a-z]{1,8}".prop_map(|s| json!(s)),
        any::<i64>().prop_map(|n| json!(n)),
        Just(json!({"a": "b"})),
    ]) {
        let req: RunFunctionRequest = serde_json::from_value(json!({
            "observed": {"composite": {"resource": {
                "metadata": {"name": "test"},
                "spec": {"region": "us-east-2", "names": scalar}
            }}}
        }))
        .unwrap();

        let f = Function::new(Span::none());
        prop_assert!(f.transform(&req).is_err());
        let rsp = f.run_function(&req);
        prop_assert!(rsp.is_fatal());
        prop_assert!(rsp.desired.is_none());
    }
}
