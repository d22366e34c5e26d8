use std::fmt;

/// A search phrase submitted to the news site. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn parse(phrase: &str) -> Result<Query, String> {
        match phrase.trim().is_empty() {
            true => Err(format!("'{}' is not a valid search phrase", phrase)),
            false => Ok(Query(phrase.to_string())),
        }
    }

    /// File-name friendly form, used to tag screenshots and images.
    pub fn slug(&self) -> String {
        self.0
            .chars()
            .map(|c| match c.is_alphanumeric() {
                true => c,
                false => '_',
            })
            .collect()
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
