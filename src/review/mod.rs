//! The interactive review: present one unknown word at a time and turn each
//! decision into an edit on the live document.

pub mod apply;
pub mod engine;
pub mod locator;
pub mod occurrence;
pub mod oracle;
pub mod session;
pub mod sessions;

pub use engine::{ReviewEngine, ReviewState, Step};
pub use locator::Locator;
pub use occurrence::{Finding, Position, Range, UnknownWord};
pub use oracle::{DictionaryOracle, ScanInput};
pub use session::SessionState;
pub use sessions::ReviewSessions;
