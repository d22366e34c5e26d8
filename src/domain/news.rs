use crate::domain::query::Query;

/// Fields scraped from the first search result and its article page.
/// Any of them may be empty when the page is malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_ref: String,
}

/// Normalized facts for one successful query. Built by the extractor only.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    query: Query,
    title: String,
    date: String,
    description: String,
    image_ref: String,
    title_occurrences: usize,
    description_occurrences: usize,
    title_has_money: bool,
    description_has_money: bool,
}

pub const REPORT_HEADERS: [&str; 9] = [
    "Search phrase",
    "Title",
    "Date",
    "Description",
    "Image URL",
    "Title Search Count",
    "Description Search Count",
    "Title Contains Money",
    "Description Contains Money",
];

impl Record {
    pub(crate) fn new(
        query: Query,
        raw: RawResult,
        occurrences: (usize, usize),
        has_money: (bool, bool),
    ) -> Self {
        Record {
            query,
            title: raw.title,
            date: raw.date,
            description: raw.description,
            image_ref: raw.image_ref,
            title_occurrences: occurrences.0,
            description_occurrences: occurrences.1,
            title_has_money: has_money.0,
            description_has_money: has_money.1,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    pub fn title_occurrences(&self) -> usize {
        self.title_occurrences
    }

    pub fn description_occurrences(&self) -> usize {
        self.description_occurrences
    }

    pub fn title_has_money(&self) -> bool {
        self.title_has_money
    }

    pub fn description_has_money(&self) -> bool {
        self.description_has_money
    }

    /// Report row in `REPORT_HEADERS` order.
    pub fn row(&self) -> [String; 9] {
        [
            self.query.to_string(),
            self.title.clone(),
            self.date.clone(),
            self.description.clone(),
            self.image_ref.clone(),
            self.title_occurrences.to_string(),
            self.description_occurrences.to_string(),
            render_bool(self.title_has_money),
            render_bool(self.description_has_money),
        ]
    }
}

fn render_bool(value: bool) -> String {
    match value {
        true => "True".to_string(),
        false => "False".to_string(),
    }
}
