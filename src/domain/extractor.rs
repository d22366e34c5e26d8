use crate::domain::{
    money::MoneyDetector,
    news::{RawResult, Record},
    occurrence::count_occurrences,
    query::Query,
};

/// Turns scraped page fields into a `Record`. Pure: no I/O, no failure mode.
#[derive(Default)]
pub struct Extractor {
    money_detector: MoneyDetector,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            money_detector: MoneyDetector::new(),
        }
    }

    pub fn extract(&self, query: &Query, raw: RawResult) -> Record {
        let occurrences = (
            count_occurrences(query.as_ref(), &raw.title),
            count_occurrences(query.as_ref(), &raw.description),
        );
        let has_money = (
            self.money_detector.contains_money(&raw.title),
            self.money_detector.contains_money(&raw.description),
        );

        Record::new(query.clone(), raw, occurrences, has_money)
    }
}
