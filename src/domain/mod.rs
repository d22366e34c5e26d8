pub mod extractor;
pub mod money;
pub mod news;
pub mod occurrence;
pub mod query;
pub mod work_item;
