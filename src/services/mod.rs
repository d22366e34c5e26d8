pub mod automation;
pub mod batch_runner;
pub mod droid;
pub mod image_store;
pub mod producer;
pub mod retry_orchestrator;
pub mod search_attempt;

pub use automation::*;
pub use batch_runner::*;
pub use droid::*;
pub use image_store::*;
pub use producer::*;
pub use retry_orchestrator::*;
pub use search_attempt::*;
