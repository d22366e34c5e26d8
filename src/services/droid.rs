use std::{path::Path, time::Duration};

use async_trait::async_trait;
use thirtyfour::{error::WebDriverError, prelude::*, ChromiumLikeCapabilities};

use crate::{
    configuration::BrowserSettings,
    services::{Automation, AutomationError, Locator, Session},
};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn keystrokes(text: &str, submit: bool) -> TypingData {
    match submit {
        true => text + Key::Enter,
        false => TypingData::from(text),
    }
}

/// Chrome over WebDriver.
pub struct Droid {
    webdriver_url: String,
    headless: bool,
}

pub struct DroidSession {
    driver: WebDriver,
}

impl Droid {
    pub fn new(settings: &BrowserSettings) -> Self {
        Droid {
            webdriver_url: settings.webdriver_url.clone(),
            headless: settings.headless,
        }
    }
}

#[async_trait]
impl Automation for Droid {
    type Session = DroidSession;

    async fn open_session(&self, url: &str) -> Result<DroidSession, AutomationError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()
                .map_err(|e| AutomationError::Launch(e.to_string()))?;
        }

        let driver = WebDriver::new(self.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| AutomationError::Launch(e.to_string()))?;

        let session = DroidSession { driver };
        if let Err(e) = session.open(url).await {
            _ = session.driver.quit().await;
            return Err(e);
        }

        log::info!("Opened browser on {}", url);
        Ok(session)
    }
}

impl DroidSession {
    async fn open(&self, url: &str) -> Result<(), AutomationError> {
        self.driver
            .maximize_window()
            .await
            .map_err(|e| AutomationError::Launch(e.to_string()))?;
        self.driver
            .goto(url)
            .await
            .map_err(|e| AutomationError::Launch(e.to_string()))
    }

    /// An element failure on a dead session is a lost session, not a flaky page.
    async fn classify(&self, locator: &Locator, error: WebDriverError) -> AutomationError {
        match self.driver.current_url().await {
            Ok(_) => AutomationError::ElementUnavailable {
                locator: locator.clone(),
                reason: error.to_string(),
            },
            Err(probe) => AutomationError::SessionLost(format!("{} ({})", error, probe)),
        }
    }

    async fn find(&self, locator: &Locator) -> Result<WebElement, AutomationError> {
        match self.driver.find(By::XPath(locator.as_str())).await {
            Ok(element) => Ok(element),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }
}

#[async_trait]
impl Session for DroidSession {
    async fn click(&mut self, locator: &Locator) -> Result<(), AutomationError> {
        let element = self.find(locator).await?;
        match element.click().await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }

    async fn type_text(
        &mut self,
        locator: &Locator,
        text: &str,
        submit: bool,
    ) -> Result<(), AutomationError> {
        let element = self.find(locator).await?;
        match element.send_keys(keystrokes(text, submit)).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }

    async fn wait_visible(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), AutomationError> {
        let result = self
            .driver
            .query(By::XPath(locator.as_str()))
            .wait(timeout, POLL_INTERVAL)
            .and_displayed()
            .first()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match self.classify(locator, e).await {
                AutomationError::ElementUnavailable { locator, .. } => {
                    Err(AutomationError::Timeout {
                        locator,
                        seconds: timeout.as_secs(),
                    })
                }
                fatal => Err(fatal),
            },
        }
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<String, AutomationError> {
        let element = self.find(locator).await?;
        match element.text().await {
            Ok(text) => Ok(text),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }

    async fn read_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, AutomationError> {
        let element = self.find(locator).await?;
        match element.attr(name).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize, AutomationError> {
        match self.driver.find_all(By::XPath(locator.as_str())).await {
            Ok(elements) => Ok(elements.len()),
            Err(e) => Err(self.classify(locator, e).await),
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), AutomationError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AutomationError::Artifact {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        match self.driver.screenshot(path).await {
            Ok(()) => Ok(()),
            Err(e) => match self.driver.current_url().await {
                Ok(_) => Err(AutomationError::Artifact {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }),
                Err(probe) => Err(AutomationError::SessionLost(format!("{} ({})", e, probe))),
            },
        }
    }

    async fn close(self) -> Result<(), AutomationError> {
        self.driver
            .quit()
            .await
            .map_err(|e| AutomationError::SessionLost(e.to_string()))
    }
}
