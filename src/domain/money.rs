use regex::Regex;

// A dollar amount with optional thousands separators, decimals and magnitude,
// or the plain currency words. Substring semantics, no word boundaries.
const MONEY_PATTERN: &str =
    r"(?i)\$\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:[kmb]\b|thousand|million|billion|trillion))?|dollars|usd";

pub struct MoneyDetector {
    money_regex: Regex,
}

impl Default for MoneyDetector {
    fn default() -> Self {
        MoneyDetector::new()
    }
}

impl MoneyDetector {
    pub fn new() -> Self {
        MoneyDetector {
            money_regex: Regex::new(MONEY_PATTERN).expect("money pattern is a valid regex"),
        }
    }

    pub fn contains_money(&self, text: &str) -> bool {
        self.money_regex.is_match(text)
    }
}
