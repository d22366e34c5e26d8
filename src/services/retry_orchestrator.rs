use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{
    configuration::Selectors,
    domain::{extractor::Extractor, news::Record, query::Query},
    services::{AttemptOutcome, AutomationError, SearchAttempt, Session},
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("max_attempts must be a positive integer")]
    ZeroAttempts,
    #[error("wait_between_attempts_seconds must be a non-negative number, got {0}")]
    InvalidWait(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait_between_attempts: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, wait_between_attempts_seconds: f64) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let wait_between_attempts = Duration::try_from_secs_f64(wait_between_attempts_seconds)
            .map_err(|_| ConfigError::InvalidWait(wait_between_attempts_seconds))?;

        Ok(RetryPolicy {
            max_attempts,
            wait_between_attempts,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            wait_between_attempts: Duration::from_secs(2),
        }
    }
}

/// Runs search attempts for one query on a shared session until one yields
/// a record or the attempt budget runs out.
pub struct RetryOrchestrator {
    policy: RetryPolicy,
    selectors: Selectors,
    element_timeout: Duration,
    screenshot_directory: PathBuf,
    extractor: Extractor,
}

impl RetryOrchestrator {
    pub fn new(
        policy: RetryPolicy,
        selectors: Selectors,
        element_timeout: Duration,
        screenshot_directory: PathBuf,
    ) -> Self {
        RetryOrchestrator {
            policy,
            selectors,
            element_timeout,
            screenshot_directory,
            extractor: Extractor::new(),
        }
    }

    pub async fn run<S: Session>(
        &self,
        session: &mut S,
        query: &Query,
    ) -> Result<Option<Record>, AutomationError> {
        let search = SearchAttempt::new(&self.selectors, self.element_timeout);

        for attempt_number in 1..=self.policy.max_attempts {
            let is_last_attempt = attempt_number == self.policy.max_attempts;

            match search.attempt(session, query).await? {
                AttemptOutcome::Success(raw) if !raw.description.is_empty() => {
                    log::info!("Extracted news for {} on attempt {}", query, attempt_number);
                    return Ok(Some(self.extractor.extract(query, raw)));
                }
                AttemptOutcome::Success(_) => {
                    log::warn!(
                        "Empty description for {} on attempt {}. Retrying...",
                        query,
                        attempt_number
                    );
                }
                AttemptOutcome::NoResults => {
                    log::warn!("No results for {} on attempt {}", query, attempt_number);
                    if is_last_attempt {
                        self.capture_no_results(session, query, attempt_number).await;
                        return Ok(None);
                    }
                }
                AttemptOutcome::TransientFailure(e) => {
                    log::error!(
                        "Attempt {} for {} failed: {}. Retrying...",
                        attempt_number,
                        query,
                        e
                    );
                }
            }

            if !is_last_attempt {
                tokio::time::sleep(self.policy.wait_between_attempts).await;
            }
        }

        log::error!(
            "Giving up on {} after {} attempts",
            query,
            self.policy.max_attempts
        );
        Ok(None)
    }

    async fn capture_no_results<S: Session>(&self, session: &mut S, query: &Query, attempt: u32) {
        let path = self.screenshot_directory.join(format!(
            "no_results_{}_attempt_{}.png",
            query.slug(),
            attempt
        ));

        match session.screenshot(&path).await {
            Ok(()) => log::info!("Saved no-results screenshot to {}", path.display()),
            Err(e) => log::error!("Failed to capture screenshot for {}: {}", query, e),
        }
    }
}
