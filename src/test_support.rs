//! Scripted in-memory doubles for the browser, the report and the queue.

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    configuration::Selectors,
    dal::{
        report_file::{ReportError, ReportSink},
        work_item_file::{QueueError, WorkQueue},
    },
    domain::{
        news::Record,
        work_item::{ItemState, WorkItem},
    },
    services::{Automation, AutomationError, Locator, Session},
};

pub fn selectors() -> Selectors {
    Selectors {
        consent_button: Locator::new("//consent"),
        search_toggle: Locator::new("//search-toggle"),
        search_input: Locator::new("//search-input"),
        results_container: Locator::new("//results"),
        result_items: Locator::new("//results/item"),
        first_result_link: Locator::new("//results/item[1]/a"),
        first_result_description: Locator::new("//results/item[1]/p"),
        article_title: Locator::new("//article/h1"),
        article_date: Locator::new("//article/time"),
        article_image: Locator::new("//article/img"),
    }
}

/// What the site does for one attempt.
#[derive(Debug, Clone)]
pub enum Scripted {
    Hit { title: String, description: String },
    NoResults,
    /// The results list never shows up.
    Timeout,
    /// Results show up, the article page never does.
    BrokenArticle,
    SessionDies,
}

impl Scripted {
    pub fn hit(title: &str, description: &str) -> Self {
        Scripted::Hit {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Per-query sequence of attempts. Unscripted attempts find no results.
#[derive(Default)]
pub struct Script {
    steps: HashMap<String, VecDeque<Scripted>>,
}

impl Script {
    pub fn new() -> Self {
        Script::default()
    }

    pub fn on<const N: usize>(mut self, query: &str, steps: [Scripted; N]) -> Self {
        self.steps
            .entry(query.to_string())
            .or_default()
            .extend(steps);
        self
    }
}

#[derive(Default, Clone)]
pub struct FakeState {
    pub sessions_opened: usize,
    pub closes: usize,
    pub searches: Vec<String>,
    pub screenshots: Vec<PathBuf>,
    pub clicks_on_first_result: usize,
    pub consent_dismissals: usize,
}

struct Shared {
    script: Script,
    state: FakeState,
}

pub struct FakeSession {
    shared: Arc<Mutex<Shared>>,
    selectors: Selectors,
    current: Option<Scripted>,
    consent_overlay: bool,
    dead: bool,
}

impl FakeSession {
    pub fn new(script: Script) -> Self {
        FakeSession::with_shared(Arc::new(Mutex::new(Shared {
            script,
            state: FakeState::default(),
        })))
    }

    fn with_shared(shared: Arc<Mutex<Shared>>) -> Self {
        FakeSession {
            shared,
            selectors: selectors(),
            current: None,
            consent_overlay: false,
            dead: false,
        }
    }

    pub fn with_consent_overlay(mut self) -> Self {
        self.consent_overlay = true;
        self
    }

    pub fn state(&self) -> FakeState {
        self.lock().state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap()
    }

    fn alive(&self) -> Result<(), AutomationError> {
        match self.dead {
            true => Err(AutomationError::SessionLost("invalid session id".to_string())),
            false => Ok(()),
        }
    }

    fn missing(locator: &Locator) -> AutomationError {
        AutomationError::ElementUnavailable {
            locator: locator.clone(),
            reason: "no such element".to_string(),
        }
    }

    fn timeout(locator: &Locator) -> AutomationError {
        AutomationError::Timeout {
            locator: locator.clone(),
            seconds: 1,
        }
    }

    fn has_results(&self) -> bool {
        matches!(
            self.current,
            Some(Scripted::Hit { .. }) | Some(Scripted::BrokenArticle)
        )
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn click(&mut self, locator: &Locator) -> Result<(), AutomationError> {
        self.alive()?;
        let s = &self.selectors;
        if *locator == s.consent_button {
            if !self.consent_overlay {
                return Err(FakeSession::missing(locator));
            }
            self.consent_overlay = false;
            self.lock().state.consent_dismissals += 1;
            Ok(())
        } else if *locator == s.search_toggle {
            Ok(())
        } else if *locator == s.first_result_link && self.has_results() {
            self.lock().state.clicks_on_first_result += 1;
            Ok(())
        } else {
            Err(FakeSession::missing(locator))
        }
    }

    async fn type_text(
        &mut self,
        locator: &Locator,
        text: &str,
        submit: bool,
    ) -> Result<(), AutomationError> {
        self.alive()?;
        if *locator != self.selectors.search_input || !submit {
            return Err(FakeSession::missing(locator));
        }

        let mut shared = self.lock();
        shared.state.searches.push(text.to_string());
        let step = shared
            .script
            .steps
            .get_mut(text)
            .and_then(|steps| steps.pop_front())
            .unwrap_or(Scripted::NoResults);
        drop(shared);

        self.current = Some(step);
        Ok(())
    }

    async fn wait_visible(
        &mut self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<(), AutomationError> {
        self.alive()?;
        let s = &self.selectors;
        if *locator == s.search_input {
            return Ok(());
        }
        if *locator == s.results_container {
            return match self.current {
                Some(Scripted::Timeout) => Err(FakeSession::timeout(locator)),
                Some(Scripted::SessionDies) => {
                    self.dead = true;
                    self.alive()
                }
                Some(_) => Ok(()),
                None => Err(FakeSession::timeout(locator)),
            };
        }
        if *locator == s.article_title {
            return match self.current {
                Some(Scripted::Hit { .. }) => Ok(()),
                _ => Err(FakeSession::timeout(locator)),
            };
        }
        Err(FakeSession::timeout(locator))
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<String, AutomationError> {
        self.alive()?;
        let s = &self.selectors;
        match &self.current {
            Some(Scripted::Hit { title, description }) => {
                if *locator == s.first_result_description {
                    Ok(description.clone())
                } else if *locator == s.article_title {
                    Ok(title.clone())
                } else if *locator == s.article_date {
                    Ok("June 5, 2024".to_string())
                } else {
                    Err(FakeSession::missing(locator))
                }
            }
            Some(Scripted::BrokenArticle) if *locator == s.first_result_description => {
                Ok("a description".to_string())
            }
            _ => Err(FakeSession::missing(locator)),
        }
    }

    async fn read_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, AutomationError> {
        self.alive()?;
        match &self.current {
            Some(Scripted::Hit { title, .. })
                if *locator == self.selectors.article_image && name == "src" =>
            {
                Ok(Some(format!("https://gothamist.com/img/{}.jpg", title)))
            }
            _ => Err(FakeSession::missing(locator)),
        }
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize, AutomationError> {
        self.alive()?;
        if *locator != self.selectors.result_items {
            return Err(FakeSession::missing(locator));
        }
        match self.has_results() {
            true => Ok(1),
            false => Ok(0),
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), AutomationError> {
        self.alive()?;
        self.lock().state.screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(self) -> Result<(), AutomationError> {
        self.lock().state.closes += 1;
        Ok(())
    }
}

pub struct FakeAutomation {
    shared: Arc<Mutex<Shared>>,
    launch_fails: bool,
}

impl FakeAutomation {
    pub fn new(script: Script) -> Self {
        FakeAutomation {
            shared: Arc::new(Mutex::new(Shared {
                script,
                state: FakeState::default(),
            })),
            launch_fails: false,
        }
    }

    pub fn failing_launch() -> Self {
        FakeAutomation {
            launch_fails: true,
            ..FakeAutomation::new(Script::new())
        }
    }

    pub fn state(&self) -> FakeState {
        self.shared.lock().unwrap().state.clone()
    }
}

#[async_trait]
impl Automation for FakeAutomation {
    type Session = FakeSession;

    async fn open_session(&self, _url: &str) -> Result<FakeSession, AutomationError> {
        if self.launch_fails {
            return Err(AutomationError::Launch("connection refused".to_string()));
        }
        self.shared.lock().unwrap().state.sessions_opened += 1;
        Ok(FakeSession::with_shared(self.shared.clone()))
    }
}

#[derive(Default)]
pub struct MemoryReport {
    reports: Mutex<Vec<Vec<Record>>>,
    fails: bool,
}

impl MemoryReport {
    pub fn failing() -> Self {
        MemoryReport {
            fails: true,
            ..MemoryReport::default()
        }
    }

    pub fn reports(&self) -> Vec<Vec<Record>> {
        self.reports.lock().unwrap().clone()
    }
}

impl ReportSink for MemoryReport {
    fn write(&self, records: &[Record]) -> Result<PathBuf, ReportError> {
        if self.fails {
            return Err(ReportError::Io(std::io::Error::other("disk full")));
        }
        self.reports.lock().unwrap().push(records.to_vec());
        Ok(PathBuf::from("output/news_report.csv"))
    }
}

pub struct MemoryQueue {
    pending: VecDeque<WorkItem>,
    released: Vec<(String, ItemState)>,
}

impl MemoryQueue {
    pub fn new(items: Vec<WorkItem>) -> Self {
        MemoryQueue {
            pending: items.into(),
            released: vec![],
        }
    }

    pub fn released(&self) -> &[(String, ItemState)] {
        &self.released
    }
}

impl WorkQueue for MemoryQueue {
    fn reserve(&mut self) -> Option<WorkItem> {
        self.pending.pop_front()
    }

    fn release(&mut self, item: WorkItem, state: ItemState) -> Result<(), QueueError> {
        self.released.push((item.id, state));
        Ok(())
    }
}
