use std::time::Duration;

use crate::{
    configuration::Selectors,
    domain::{news::RawResult, query::Query},
    services::{AutomationError, Session},
};

/// How one search-and-extract cycle ended.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(RawResult),
    /// The site answered and has nothing for the query.
    NoResults,
    TransientFailure(AutomationError),
}

enum AttemptState {
    Idle,
    Searching,
    ResultsKnown(usize),
    Extracting { description: String },
    Done(RawResult),
}

/// One search-and-extract cycle against an open session.
pub struct SearchAttempt<'a> {
    selectors: &'a Selectors,
    timeout: Duration,
}

impl<'a> SearchAttempt<'a> {
    pub fn new(selectors: &'a Selectors, timeout: Duration) -> Self {
        SearchAttempt { selectors, timeout }
    }

    /// Only a fatal automation error is returned as `Err`; page-level failures
    /// come back as `AttemptOutcome::TransientFailure`.
    pub async fn attempt<S: Session>(
        &self,
        session: &mut S,
        query: &Query,
    ) -> Result<AttemptOutcome, AutomationError> {
        let mut state = AttemptState::Idle;

        loop {
            state = match state {
                AttemptState::ResultsKnown(0) => return Ok(AttemptOutcome::NoResults),
                AttemptState::Done(raw) => return Ok(AttemptOutcome::Success(raw)),
                current => match self.advance(session, query, current).await {
                    Ok(next) => next,
                    Err(e) if e.is_transient() => return Ok(AttemptOutcome::TransientFailure(e)),
                    Err(e) => return Err(e),
                },
            };
        }
    }

    async fn advance<S: Session>(
        &self,
        session: &mut S,
        query: &Query,
        state: AttemptState,
    ) -> Result<AttemptState, AutomationError> {
        match state {
            AttemptState::Idle => {
                self.dismiss_consent(session).await?;
                self.search(session, query).await?;
                Ok(AttemptState::Searching)
            }
            AttemptState::Searching => {
                session
                    .wait_visible(&self.selectors.results_container, self.timeout)
                    .await?;
                let count = session.count(&self.selectors.result_items).await?;
                log::info!("Found {} results for {}", count, query);
                Ok(AttemptState::ResultsKnown(count))
            }
            AttemptState::ResultsKnown(_) => {
                let description = session
                    .read_text(&self.selectors.first_result_description)
                    .await?;
                session.click(&self.selectors.first_result_link).await?;
                Ok(AttemptState::Extracting { description })
            }
            AttemptState::Extracting { description } => {
                session
                    .wait_visible(&self.selectors.article_title, self.timeout)
                    .await?;
                let title = session.read_text(&self.selectors.article_title).await?;
                let date = session.read_text(&self.selectors.article_date).await?;
                let image_ref = session
                    .read_attribute(&self.selectors.article_image, "src")
                    .await?
                    .unwrap_or_default();

                Ok(AttemptState::Done(RawResult {
                    title,
                    date,
                    description,
                    image_ref,
                }))
            }
            AttemptState::Done(raw) => Ok(AttemptState::Done(raw)),
        }
    }

    /// Best effort: a missing overlay is the normal case.
    async fn dismiss_consent<S: Session>(&self, session: &mut S) -> Result<(), AutomationError> {
        match session.click(&self.selectors.consent_button).await {
            Ok(()) => {
                log::info!("Dismissed consent overlay");
                Ok(())
            }
            Err(e) if e.is_transient() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn search<S: Session>(&self, session: &mut S, query: &Query) -> Result<(), AutomationError> {
        session.click(&self.selectors.search_toggle).await?;
        session
            .wait_visible(&self.selectors.search_input, self.timeout)
            .await?;
        session
            .type_text(&self.selectors.search_input, query.as_ref(), true)
            .await
    }
}
