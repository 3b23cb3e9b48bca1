//! Resolution of all lookup links of an event body.
//!
//! Links are walked in order. Passthrough links are copied as they are; each
//! unresolved link goes through query, fetch, decode, policy and rewrite, and
//! its resolved links take its place in the collection. Any failure aborts
//! the whole resolution and the body is dropped, so a caller can never act on
//! a partially rewritten event.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::RepositoryClient;
use crate::decoder::decode_identifiers;
use crate::errors::LookupError;
use crate::models::{
    has_unresolved_links, LinkEntry, LookupLink, LookupPolicyConfig, LookupResult, LINKS_POINTER,
};
use crate::policy;
use crate::query::LookupQuery;
use crate::rewriter;

/// Deployment-wide lookup settings. Read-only once built.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LookupSettings {
    /// Whether lookups are resolved at all.
    pub enabled: bool,
    /// Search endpoint of the Event Repository.
    pub base_url: String,
}

/// Resolves lookup links against the Event Repository.
///
/// Shared by all concurrent requests; every lookup keeps its repository
/// answer on its own stack.
#[derive(Clone)]
pub struct LookupOrchestrator {
    settings: LookupSettings,
    client: RepositoryClient,
}

impl LookupOrchestrator {
    pub fn new(settings: LookupSettings, client: RepositoryClient) -> Self {
        Self { settings, client }
    }

    /// Resolve every lookup link of `body`.
    ///
    /// Returns the body untouched, without contacting the repository, when
    /// lookups are disabled or no link targets the placeholder.
    pub async fn resolve(
        &self,
        mut body: Value,
        config: &LookupPolicyConfig,
    ) -> Result<Value, LookupError> {
        if !self.settings.enabled {
            debug!("Event repository lookup disabled, passing body through");
            return Ok(body);
        }
        if !has_unresolved_links(&body) {
            debug!("No lookup links in body, passing through");
            return Ok(body);
        }
        config.validate()?;

        let links = match body.pointer_mut(LINKS_POINTER) {
            Some(Value::Array(links)) => std::mem::take(links),
            // has_unresolved_links guarantees an array
            _ => return Err(LookupError::InvalidInput("eventParams.links is not an array".to_string())),
        };

        let mut resolved = Vec::with_capacity(links.len());
        for (index, link) in links.into_iter().enumerate() {
            match LinkEntry::classify(link)? {
                LinkEntry::Passthrough(link) => resolved.push(link),
                LinkEntry::Unresolved(lookup) => {
                    let result = self.lookup(index, &lookup, config).await?;
                    let identifiers = policy::evaluate(result.identifiers, config).map_err(|e| {
                        warn!("Lookup for link {} ({}) rejected: {}", index, lookup.link_type, e);
                        e
                    })?;
                    debug!(
                        "Link {} ({}) resolved to {} link(s)",
                        index,
                        lookup.link_type,
                        identifiers.len()
                    );
                    resolved.extend(rewriter::expand(&lookup, &identifiers));
                }
            }
        }

        if let Some(slot) = body.pointer_mut(LINKS_POINTER) {
            *slot = Value::Array(resolved);
        }
        Ok(body)
    }

    /// Query the repository for one lookup link.
    async fn lookup(
        &self,
        index: usize,
        lookup: &LookupLink,
        config: &LookupPolicyConfig,
    ) -> Result<LookupResult, LookupError> {
        let query = LookupQuery::new(lookup, config)?;
        debug!(
            "Resolving link {} ({}) by criteria {}",
            index,
            lookup.link_type,
            query.criteria()
        );
        let url = query.to_url(&self.settings.base_url);

        let response = self.client.fetch(&url).await?;
        if !response.is_success() {
            warn!(
                "Event repository gave up on link {} with status {}",
                index, response.status
            );
            return Err(LookupError::RepositoryUnavailable {
                attempts: self.client.policy().attempts(),
                last_status: response.status,
            });
        }

        let identifiers = decode_identifiers(&response.body).map_err(|e| {
            warn!("Event repository answer for link {} not usable: {}", index, e);
            e
        })?;
        info!(
            "Event repository returned {} id(s) for link {} ({})",
            identifiers.len(),
            index,
            lookup.link_type
        );

        Ok(LookupResult {
            status: response.status,
            identifiers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RepositoryTransport, RetryPolicy};
    use crate::errors::{PolicyViolation, TransportError};
    use crate::models::RepositoryResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Step = Result<RepositoryResponse, TransportError>;

    /// Answers by the `meta.id` criterion found in the URL; falls back to a
    /// scripted queue for URLs without a route.
    #[derive(Default)]
    struct MockRepository {
        routes: HashMap<String, String>,
        script: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockRepository {
        fn routed(routes: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                routes: routes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                ..Default::default()
            })
        }

        fn scripted(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(steps.into()),
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RepositoryTransport for MockRepository {
        async fn get(&self, url: &str) -> Result<RepositoryResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let id = url
                .split(['?', '&'])
                .find_map(|pair| pair.strip_prefix("meta.id="))
                .unwrap_or_default();
            if let Some(body) = self.routes.get(id) {
                return Ok(RepositoryResponse::new(200, body.clone()));
            }
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RepositoryResponse::new(404, "")))
        }
    }

    fn orchestrator(repository: Arc<MockRepository>) -> LookupOrchestrator {
        LookupOrchestrator::new(
            LookupSettings {
                enabled: true,
                base_url: "http://er.local/search".to_string(),
            },
            RepositoryClient::new(repository, RetryPolicy::default()),
        )
    }

    fn lookup_link(link_type: &str, id: &str) -> Value {
        json!({"type": link_type, "target": "%lookup%", "criteria": {"meta.id": id}})
    }

    fn body(links: Vec<Value>) -> Value {
        json!({
            "msgParams": {"meta": {"type": "ActivityFinished"}},
            "eventParams": {"data": {"outcome": "SUCCESSFUL"}, "links": links}
        })
    }

    fn limit(limit: u32) -> LookupPolicyConfig {
        LookupPolicyConfig {
            limit,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_example_cause_lookup_with_limit_two() {
        let repository = MockRepository::routed(&[("X", r#"["A", "B"]"#)]);
        let input = body(vec![
            json!({"type": "CONTEXT", "target": "ctx-1"}),
            lookup_link("CAUSE", "X"),
        ]);

        let output = orchestrator(repository.clone())
            .resolve(input, &limit(2))
            .await
            .unwrap();

        assert_eq!(
            output,
            body(vec![
                json!({"type": "CONTEXT", "target": "ctx-1"}),
                json!({"type": "CAUSE", "target": "A"}),
                json!({"type": "CAUSE", "target": "B"}),
            ])
        );
        assert_eq!(repository.calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_lookup_passes_through() {
        let repository = MockRepository::routed(&[("X", r#"["A"]"#)]);
        let orchestrator = LookupOrchestrator::new(
            LookupSettings {
                enabled: false,
                base_url: "http://er.local/search".to_string(),
            },
            RepositoryClient::new(repository.clone(), RetryPolicy::default()),
        );
        let input = body(vec![lookup_link("CAUSE", "X")]);

        let output = orchestrator
            .resolve(input.clone(), &LookupPolicyConfig::default())
            .await
            .unwrap();
        assert_eq!(output, input);
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_body_without_placeholder_passes_through() {
        let repository = MockRepository::routed(&[]);
        let inputs = vec![
            body(vec![json!({"type": "CAUSE", "target": "id-1"})]),
            body(vec![]),
            json!({"eventParams": {"data": {"comment": "%lookup% in free text"}}}),
            json!({"msgParams": {}}),
        ];

        for input in inputs {
            let output = orchestrator(repository.clone())
                .resolve(input.clone(), &LookupPolicyConfig::default())
                .await
                .unwrap();
            assert_eq!(output, input);
        }
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_order_is_preserved_around_resolved_groups() {
        let repository = MockRepository::routed(&[
            ("X", r#"["x1", "x2", "x3"]"#),
            ("Y", r#"[]"#),
            ("Z", r#"{"items": [{"meta": {"id": "z1"}}]}"#),
        ]);
        let input = body(vec![
            json!({"type": "CONTEXT", "target": "p1"}),
            lookup_link("CAUSE", "X"),
            json!({"type": "FLOW_CONTEXT", "target": "p2"}),
            lookup_link("CAUSE", "Y"),
            lookup_link("PREVIOUS_VERSION", "Z"),
            json!({"type": "ELEMENT", "target": ["p3", "p4"]}),
        ]);

        let output = orchestrator(repository)
            .resolve(input, &limit(2))
            .await
            .unwrap();

        assert_eq!(
            output.pointer(LINKS_POINTER).unwrap(),
            &json!([
                {"type": "CONTEXT", "target": "p1"},
                {"type": "CAUSE", "target": "x1"},
                {"type": "CAUSE", "target": "x2"},
                {"type": "FLOW_CONTEXT", "target": "p2"},
                {"type": "PREVIOUS_VERSION", "target": "z1"},
                {"type": "ELEMENT", "target": ["p3", "p4"]},
            ])
        );
        assert_eq!(output["eventParams"]["data"], json!({"outcome": "SUCCESSFUL"}));
    }

    #[tokio::test]
    async fn test_resolved_count_is_bounded_by_limit() {
        let repository = MockRepository::routed(&[("X", r#"["a", "b", "c", "d"]"#)]);

        for l in 1..=6u32 {
            let output = orchestrator(repository.clone())
                .resolve(body(vec![lookup_link("CAUSE", "X")]), &limit(l))
                .await
                .unwrap();
            let links = output.pointer(LINKS_POINTER).unwrap().as_array().unwrap();
            assert_eq!(links.len(), (l as usize).min(4));
        }
    }

    #[tokio::test]
    async fn test_fail_if_multiple_found_aborts() {
        let repository = MockRepository::routed(&[("X", r#"["A", "B"]"#)]);
        let config = LookupPolicyConfig {
            fail_if_multiple_found: true,
            ..Default::default()
        };

        let err = orchestrator(repository)
            .resolve(body(vec![lookup_link("CAUSE", "X")]), &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::PolicyViolation(PolicyViolation::FailMultiple { found: 2 })
        ));
    }

    #[tokio::test]
    async fn test_fail_if_none_found_aborts_after_earlier_success() {
        let repository = MockRepository::routed(&[("X", r#"["A"]"#), ("Y", "[]")]);
        let config = LookupPolicyConfig {
            fail_if_none_found: true,
            ..Default::default()
        };

        let err = orchestrator(repository.clone())
            .resolve(
                body(vec![lookup_link("CAUSE", "X"), lookup_link("CAUSE", "Y")]),
                &config,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::PolicyViolation(PolicyViolation::FailNone)
        ));
        assert_eq!(repository.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let repository = MockRepository::scripted(vec![
            Err(TransportError::new("connection reset")),
            Ok(RepositoryResponse::new(200, r#"["second"]"#)),
        ]);

        let output = orchestrator(repository.clone())
            .resolve(
                body(vec![lookup_link("CAUSE", "unrouted")]),
                &LookupPolicyConfig::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            output.pointer(LINKS_POINTER).unwrap(),
            &json!([{"type": "CAUSE", "target": "second"}])
        );
        assert_eq!(repository.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_exhausted_is_repository_unavailable() {
        let repository = MockRepository::scripted(vec![
            Err(TransportError::new("connection refused")),
            Err(TransportError::new("connection refused")),
        ]);

        let err = orchestrator(repository.clone())
            .resolve(
                body(vec![lookup_link("CAUSE", "unrouted")]),
                &LookupPolicyConfig::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Transport { attempts: 2, .. }));
        assert_eq!(err.kind(), crate::errors::LookupErrorKind::RepositoryUnavailable);
        assert_eq!(repository.calls(), 2);
    }

    #[tokio::test]
    async fn test_final_error_status_is_repository_unavailable() {
        let repository = MockRepository::scripted(vec![
            Ok(RepositoryResponse::new(500, "")),
            Ok(RepositoryResponse::new(503, "")),
        ]);

        let err = orchestrator(repository)
            .resolve(
                body(vec![lookup_link("CAUSE", "unrouted")]),
                &LookupPolicyConfig::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::RepositoryUnavailable {
                attempts: 2,
                last_status: 503
            }
        ));
    }

    #[tokio::test]
    async fn test_undecodable_answer_aborts() {
        let repository = MockRepository::routed(&[("X", r#"{"unexpected": true}"#)]);

        let err = orchestrator(repository)
            .resolve(
                body(vec![lookup_link("CAUSE", "X")]),
                &LookupPolicyConfig::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn test_lookup_without_criteria_aborts_before_any_call() {
        let repository = MockRepository::routed(&[]);

        let err = orchestrator(repository.clone())
            .resolve(
                body(vec![json!({"type": "CAUSE", "target": "%lookup%"})]),
                &LookupPolicyConfig::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_is_invalid_input() {
        let repository = MockRepository::routed(&[("X", r#"["A"]"#)]);

        let err = orchestrator(repository)
            .resolve(body(vec![lookup_link("CAUSE", "X")]), &limit(0))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_see_only_their_own_answers() {
        let routes: Vec<(String, String)> = (0..32)
            .map(|i| (format!("q{}", i), format!(r#"["answer-{}"]"#, i)))
            .collect();
        let repository = Arc::new(MockRepository {
            routes: routes.into_iter().collect(),
            delay: Some(Duration::from_millis(2)),
            ..Default::default()
        });
        let orchestrator = Arc::new(orchestrator(repository));

        let mut handles = Vec::new();
        for round in 0..4 {
            for i in 0..32 {
                let orchestrator = orchestrator.clone();
                handles.push(tokio::spawn(async move {
                    let input = body(vec![
                        json!({"type": "CONTEXT", "target": format!("own-{}-{}", round, i)}),
                        lookup_link("CAUSE", &format!("q{}", i)),
                    ]);
                    let output = orchestrator
                        .resolve(input, &LookupPolicyConfig::default())
                        .await
                        .unwrap();
                    (round, i, output)
                }));
            }
        }

        for handle in handles {
            let (round, i, output) = handle.await.unwrap();
            assert_eq!(
                output.pointer(LINKS_POINTER).unwrap(),
                &json!([
                    {"type": "CONTEXT", "target": format!("own-{}-{}", round, i)},
                    {"type": "CAUSE", "target": format!("answer-{}", i)},
                ])
            );
        }
    }
}
