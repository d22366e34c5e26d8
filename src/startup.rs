use thiserror::Error;

use crate::{
    configuration::Settings,
    dal::{report_file::ReportSink, work_item_file::WorkQueue},
    domain::work_item::{ExceptionType, ItemState, WorkItem},
    services::{
        Automation, BatchOutcome, BatchRunner, ConfigError, ImageError, ImageStore,
        RetryOrchestrator, RetryPolicy,
    },
};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid retry configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to set up image downloads: {0}")]
    Image(#[from] ImageError),
}

#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub done: usize,
    pub failed: usize,
}

pub fn build_batch_runner(settings: &Settings) -> Result<BatchRunner, StartupError> {
    let policy = RetryPolicy::new(
        settings.application.max_attempts,
        settings.application.wait_between_attempts_seconds,
    )?;
    let orchestrator = RetryOrchestrator::new(
        policy,
        settings.selectors.clone(),
        settings.browser.element_timeout(),
        settings.application.screenshot_directory(),
    );
    let runner = BatchRunner::new(orchestrator, settings.browser.site_url.clone());

    match settings.application.download_images {
        true => {
            let image_store = ImageStore::new(settings.application.image_directory())?;
            Ok(runner.with_image_store(image_store))
        }
        false => Ok(runner),
    }
}

/// Decides the terminal state of one unit of work.
pub async fn process_item<A: Automation, R: ReportSink>(
    runner: &BatchRunner,
    automation: &A,
    report: &R,
    item: &WorkItem,
) -> ItemState {
    let queries = match item.queries() {
        Ok(queries) => queries,
        Err(e) => {
            log::error!("Rejecting work item {}: {}", item.id, e);
            return ItemState::invalid_payload(&e);
        }
    };
    log::info!("Received search phrases for {}: {:?}", item.id, queries);

    let batch = match runner.run_batch(automation, &queries).await {
        Ok(batch) => batch,
        Err(e) => {
            log::error!("Error processing item {}: {}", item.id, e);
            return ItemState::failed(ExceptionType::Application, None, e.to_string());
        }
    };

    match batch.outcome() {
        BatchOutcome::NoNewsData => {
            log::warn!("No news data found for item: {}", item.id);
            ItemState::no_news_data()
        }
        BatchOutcome::Done => {
            log::info!("Writing news data to report...");
            match report.write(&batch.records) {
                Ok(path) => {
                    log::info!("News data written to {}", path.display());
                    ItemState::Done
                }
                Err(e) => {
                    log::error!("Error writing report for {}: {}", item.id, e);
                    ItemState::failed(ExceptionType::Application, None, e.to_string())
                }
            }
        }
    }
}

/// Processes every unit of work the queue yields. One item's failure never
/// stops the others.
pub async fn run<A: Automation, R: ReportSink, Q: WorkQueue>(
    runner: &BatchRunner,
    automation: &A,
    report: &R,
    queue: &mut Q,
) -> RunSummary {
    let mut summary = RunSummary::default();

    while let Some(item) = queue.reserve() {
        let state = process_item(runner, automation, report, &item).await;
        let item_id = item.id.clone();

        match state {
            ItemState::Done => summary.done += 1,
            ItemState::Failed(_) => summary.failed += 1,
        }

        if let Err(e) = queue.release(item, state) {
            log::error!("Failed to release work item {}: {}", item_id, e);
        }
    }

    log::info!(
        "Processed {} work items: {} done, {} failed",
        summary.done + summary.failed,
        summary.done,
        summary.failed
    );
    summary
}
