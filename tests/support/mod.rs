// Shared test doubles: a fixture model, a counting artifact loader, and a
// fake browser that serves canned pages and records every close().

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sentiscope::browser::manager::{SessionManager, SessionOptions};
use sentiscope::browser::traits::{BrowserLauncher, BrowserSession, Locator};
use sentiscope::error::{ExtractionError, LoadError};
use sentiscope::model::linear::LinearClassifier;
use sentiscope::model::pipeline::PipelineResources;
use sentiscope::model::tfidf::TfIdfVectorizer;
use sentiscope::model::traits::{Classifier, FeatureVector, Vectorizer};
use sentiscope::resources::loader::ArtifactLoader;

// ============================================================
// Fixture model
// ============================================================

/// Vocabulary: wonderful, great, terrible, awful, product, works.
pub const FIXTURE_VECTORIZER: &str = r#"{
    "vocabulary": {"wonderful": 0, "great": 1, "terrible": 2, "awful": 3, "product": 4, "works": 5},
    "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
}"#;

/// Positive weight on "wonderful"/"great", negative on "terrible"/"awful",
/// slightly negative bias so an empty document lands on class 0.
pub const FIXTURE_CLASSIFIER: &str = r#"{
    "classes": [0, 1],
    "coef": [[2.0, 1.0, -2.0, -2.0, 0.0, 0.0]],
    "intercept": [-0.1]
}"#;

pub fn fixture_stopwords() -> HashSet<String> {
    ["this", "is", "and", "the", "was", "it", "a"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn fixture_vectorizer() -> TfIdfVectorizer {
    TfIdfVectorizer::from_json(FIXTURE_VECTORIZER).unwrap()
}

pub fn fixture_classifier() -> LinearClassifier {
    let artifact = serde_json::from_str(FIXTURE_CLASSIFIER).unwrap();
    LinearClassifier::from_artifact(artifact).unwrap()
}

pub fn fixture_resources() -> PipelineResources {
    PipelineResources::new(
        Box::new(fixture_vectorizer()),
        Box::new(fixture_classifier()),
        fixture_stopwords(),
    )
    .unwrap()
}

/// Classifier that ignores its input and returns one code.
pub struct FixedCode(pub i64);

impl Classifier for FixedCode {
    fn predict(&self, _features: &FeatureVector) -> i64 {
        self.0
    }
}

pub fn resources_with_code(code: i64) -> PipelineResources {
    PipelineResources::new(
        Box::new(fixture_vectorizer()),
        Box::new(FixedCode(code)),
        fixture_stopwords(),
    )
    .unwrap()
}

// ============================================================
// Counting artifact loader
// ============================================================

/// Loader that counts every artifact load and can fail the vectorizer a
/// given number of times before succeeding.
#[derive(Default)]
pub struct CountingLoader {
    pub stopword_loads: AtomicUsize,
    pub vectorizer_loads: AtomicUsize,
    pub classifier_loads: AtomicUsize,
    pub vectorizer_failures_left: AtomicUsize,
    pub delay: Option<Duration>,
}

impl CountingLoader {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn failing_vectorizer(times: usize) -> Self {
        let loader = Self::default();
        loader.vectorizer_failures_left.store(times, Ordering::SeqCst);
        loader
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.stopword_loads.load(Ordering::SeqCst),
            self.vectorizer_loads.load(Ordering::SeqCst),
            self.classifier_loads.load(Ordering::SeqCst),
        )
    }
}

impl ArtifactLoader for CountingLoader {
    fn load_stopwords(&self) -> Result<HashSet<String>, LoadError> {
        self.stopword_loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(fixture_stopwords())
    }

    fn load_vectorizer(&self) -> Result<Box<dyn Vectorizer>, LoadError> {
        self.vectorizer_loads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .vectorizer_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LoadError::Invalid("corrupt vectorizer".to_string()));
        }
        Ok(Box::new(fixture_vectorizer()))
    }

    fn load_classifier(&self) -> Result<Box<dyn Classifier>, LoadError> {
        self.classifier_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(fixture_classifier()))
    }
}

// ============================================================
// Fake browser
// ============================================================

/// What the fake browser renders.
#[derive(Clone, Default)]
pub struct FakePage {
    /// Resolved href per anchor, in document order
    pub anchors: Vec<Option<String>>,
    /// Node text keyed by locator expression
    pub nodes: HashMap<String, String>,
    /// Number of node probes that find nothing before nodes appear
    pub node_delay_polls: usize,
    /// Number of readyState polls that report "loading"
    pub loading_polls: usize,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    #[default]
    None,
    LaunchFails,
    LaunchHangs,
    NavigationFails,
    NavigationHangs,
    NeverReady,
    QueryFails,
}

/// Counters shared between a fake launcher and every session it creates.
#[derive(Default)]
pub struct SessionLog {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub node_probes: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

impl SessionLog {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn node_probes(&self) -> usize {
        self.node_probes.load(Ordering::SeqCst)
    }
}

pub struct FakeLauncher {
    pub page: FakePage,
    pub fault: Fault,
    pub log: Arc<SessionLog>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self::with_fault(page, Fault::None)
    }

    pub fn with_fault(page: FakePage, fault: Fault) -> Self {
        Self {
            page,
            fault,
            log: Arc::new(SessionLog::default()),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractionError> {
        match self.fault {
            Fault::LaunchFails => {
                return Err(ExtractionError::Launch("no browser binary".to_string()))
            }
            Fault::LaunchHangs => tokio::time::sleep(Duration::from_secs(60)).await,
            _ => {}
        }
        self.log.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            page: self.page.clone(),
            fault: self.fault,
            log: Arc::clone(&self.log),
            ready_polls: 0,
            node_polls: 0,
        }))
    }
}

pub struct FakeSession {
    page: FakePage,
    fault: Fault,
    log: Arc<SessionLog>,
    ready_polls: usize,
    node_polls: usize,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractionError> {
        match self.fault {
            Fault::NavigationFails => {
                return Err(ExtractionError::Navigation {
                    url: url.to_string(),
                    cause: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                })
            }
            Fault::NavigationHangs => tokio::time::sleep(Duration::from_secs(60)).await,
            _ => {}
        }
        self.log.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn ready_state(&mut self) -> Result<String, ExtractionError> {
        self.ready_polls += 1;
        if self.fault == Fault::NeverReady || self.ready_polls <= self.page.loading_polls {
            return Ok("loading".to_string());
        }
        Ok("complete".to_string())
    }

    async fn anchor_targets(&mut self) -> Result<Vec<Option<String>>, ExtractionError> {
        if self.fault == Fault::QueryFails {
            return Err(ExtractionError::Query("Execution context was destroyed".to_string()));
        }
        Ok(self.page.anchors.clone())
    }

    async fn node_text(&mut self, locator: &Locator) -> Result<Option<String>, ExtractionError> {
        if self.fault == Fault::QueryFails {
            return Err(ExtractionError::Query("Execution context was destroyed".to_string()));
        }
        self.log.node_probes.fetch_add(1, Ordering::SeqCst);
        self.node_polls += 1;
        if self.node_polls <= self.page.node_delay_polls {
            return Ok(None);
        }
        Ok(self.page.nodes.get(locator.expression()).cloned())
    }

    async fn close(&mut self) -> Result<(), ExtractionError> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Short waits so failure paths resolve quickly.
pub fn fast_options() -> SessionOptions {
    SessionOptions {
        launch_timeout: Duration::from_millis(200),
        navigation_timeout: Duration::from_millis(200),
        settle_delay: Duration::ZERO,
        node_wait: Duration::from_millis(150),
        poll_interval: Duration::from_millis(10),
        chrome_executable: None,
    }
}

/// Session manager over a fake launcher, plus the launcher's log.
pub fn fake_manager(launcher: FakeLauncher) -> (SessionManager, Arc<SessionLog>) {
    let log = Arc::clone(&launcher.log);
    (SessionManager::new(Arc::new(launcher), fast_options()), log)
}
