use crate::{
    domain::{news::Record, query::Query, work_item::ItemState},
    services::{Automation, AutomationError, ImageStore, RetryOrchestrator, Session},
};

#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<Record>,
    pub attempted_queries: usize,
    pub succeeded_queries: usize,
}

#[derive(Debug, PartialEq)]
pub enum BatchOutcome {
    Done,
    NoNewsData,
}

impl BatchResult {
    pub fn outcome(&self) -> BatchOutcome {
        match self.records.is_empty() {
            true => BatchOutcome::NoNewsData,
            false => BatchOutcome::Done,
        }
    }
}

impl From<BatchOutcome> for ItemState {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Done => ItemState::Done,
            BatchOutcome::NoNewsData => ItemState::no_news_data(),
        }
    }
}

/// Runs every query of one unit of work on a single browser session.
pub struct BatchRunner {
    orchestrator: RetryOrchestrator,
    site_url: String,
    image_store: Option<ImageStore>,
}

impl BatchRunner {
    pub fn new(orchestrator: RetryOrchestrator, site_url: String) -> Self {
        BatchRunner {
            orchestrator,
            site_url,
            image_store: None,
        }
    }

    pub fn with_image_store(mut self, image_store: ImageStore) -> Self {
        self.image_store = Some(image_store);
        self
    }

    /// The session is closed exactly once whether the batch finishes or a
    /// fatal automation error cuts it short.
    pub async fn run_batch<A: Automation>(
        &self,
        automation: &A,
        queries: &[Query],
    ) -> Result<BatchResult, AutomationError> {
        let mut session = automation.open_session(&self.site_url).await?;

        let result = self.run_queries(&mut session, queries).await;

        log::info!("Closing the browser...");
        let closed = session.close().await;

        match (result, closed) {
            (Ok(batch), Ok(())) => Ok(batch),
            (Ok(_), Err(e)) => {
                log::error!("Error closing the browser: {}", e);
                Err(e)
            }
            (Err(e), closed) => {
                if let Err(close_error) = closed {
                    log::error!("Error closing the browser: {}", close_error);
                }
                Err(e)
            }
        }
    }

    async fn run_queries<S: Session>(
        &self,
        session: &mut S,
        queries: &[Query],
    ) -> Result<BatchResult, AutomationError> {
        let mut batch = BatchResult::default();

        for query in queries {
            log::info!("Searching for: {}", query);
            batch.attempted_queries += 1;

            match self.orchestrator.run(session, query).await? {
                Some(record) => {
                    self.store_image(&record).await;
                    batch.succeeded_queries += 1;
                    batch.records.push(record);
                }
                None => log::warn!("No news data for {}", query),
            }
        }

        log::info!(
            "Batch finished: {} of {} queries produced news",
            batch.succeeded_queries,
            batch.attempted_queries
        );
        Ok(batch)
    }

    async fn store_image(&self, record: &Record) {
        let Some(image_store) = &self.image_store else {
            return;
        };
        if record.image_ref().is_empty() {
            return;
        }

        match image_store.download(record.image_ref(), record.query()).await {
            Ok(path) => log::info!("Saved image for {} to {}", record.query(), path.display()),
            Err(e) => log::error!("Failed to save image for {}: {}", record.query(), e),
        }
    }
}
