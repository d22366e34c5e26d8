use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::services::Locator;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub browser: BrowserSettings,
    pub selectors: Selectors,
    pub work_items: WorkItemSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_attempts: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub wait_between_attempts_seconds: f64,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub download_images: bool,
}

#[derive(Deserialize, Clone)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub site_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub element_timeout_seconds: u64,
    #[serde(default)]
    pub headless: bool,
}

impl BrowserSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_seconds)
    }
}

/// XPath locators for every element the search attempt touches.
#[derive(Deserialize, Clone, Debug)]
pub struct Selectors {
    pub consent_button: Locator,
    pub search_toggle: Locator,
    pub search_input: Locator,
    pub results_container: Locator,
    pub result_items: Locator,
    pub first_result_link: Locator,
    pub first_result_description: Locator,
    pub article_title: Locator,
    pub article_date: Locator,
    pub article_image: Locator,
}

#[derive(Deserialize, Clone)]
pub struct WorkItemSettings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl ApplicationSettings {
    pub fn screenshot_directory(&self) -> PathBuf {
        self.output_directory.join("screenshots")
    }

    pub fn image_directory(&self) -> PathBuf {
        self.output_directory.join("images")
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        // E.g. `APP_APPLICATION__MAX_ATTEMPTS=5` would set `Settings.application.max_attempts`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
