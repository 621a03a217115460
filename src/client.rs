//! Thin resource clients over a host-supplied HTTP transport.

use crate::error::TransportError;
use serde_json::Value;
use tracing::debug;

const FEATURE_TNR: &str = "applicative-test/testFeature";
const SYNC_WITH_BRANCH: &str = "applicative-test/syncTnrPiecesWithBranch";
const GET_BRANCHES: &str = "applicative-test/gitBranches";

/// Issues REST calls relative to the console's resource root.
pub trait ResourceTransport {
    fn get(&self, path: &str) -> Result<Value, TransportError>;

    fn post(&self, path: &str, body: String) -> Result<Value, TransportError>;
}

/// Triggers functional (non-regression) test runs.
pub struct FunctionalTestsFeature<T> {
    transport: T,
}

impl<T: ResourceTransport> FunctionalTestsFeature<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Runs a feature file given as raw text.
    pub fn launch_feature(&self, feature: &str) -> Result<Value, TransportError> {
        debug!(bytes = feature.len(), "launching functional test feature");
        self.transport.post(FEATURE_TNR, feature.to_string())
    }

    pub fn sync_with_branch(&self, branch: &str) -> Result<Value, TransportError> {
        debug!(branch, "syncing test pieces with branch");
        self.transport.post(SYNC_WITH_BRANCH, branch.to_string())
    }

    pub fn branches(&self) -> Result<Vec<String>, TransportError> {
        let body = self.transport.get(GET_BRANCHES)?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionalTestsFeature, ResourceTransport};
    use crate::error::TransportError;
    use serde_json::{Value, json};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, String, Option<String>)>>,
        response: Value,
    }

    impl ResourceTransport for &Recorder {
        fn get(&self, path: &str) -> Result<Value, TransportError> {
            self.calls
                .borrow_mut()
                .push(("GET".to_string(), path.to_string(), None));
            Ok(self.response.clone())
        }

        fn post(&self, path: &str, body: String) -> Result<Value, TransportError> {
            self.calls
                .borrow_mut()
                .push(("POST".to_string(), path.to_string(), Some(body)));
            Ok(self.response.clone())
        }
    }

    #[test]
    fn posts_feature_text_and_branch() {
        let recorder = Recorder::default();
        let client = FunctionalTestsFeature::new(&recorder);
        client.launch_feature("Feature: ingest").expect("launch");
        client.sync_with_branch("develop").expect("sync");

        let calls = recorder.calls.borrow();
        assert_eq!(
            calls[0],
            (
                "POST".to_string(),
                "applicative-test/testFeature".to_string(),
                Some("Feature: ingest".to_string())
            )
        );
        assert_eq!(calls[1].1, "applicative-test/syncTnrPiecesWithBranch");
        assert_eq!(calls[1].2.as_deref(), Some("develop"));
    }

    #[test]
    fn decodes_branch_list() {
        let recorder = Recorder {
            response: json!(["master", "develop"]),
            ..Recorder::default()
        };
        let client = FunctionalTestsFeature::new(&recorder);
        assert_eq!(client.branches().expect("branches"), vec!["master", "develop"]);
        assert_eq!(recorder.calls.borrow()[0].1, "applicative-test/gitBranches");
    }

    #[test]
    fn malformed_branch_list_is_a_body_error() {
        let recorder = Recorder {
            response: json!({"branches": []}),
            ..Recorder::default()
        };
        let client = FunctionalTestsFeature::new(&recorder);
        assert!(matches!(client.branches(), Err(TransportError::Body(_))));
    }
}
