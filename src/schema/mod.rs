pub mod types;
pub mod write;

pub use types::{RankingRecord, CSV_HEADER};
pub use write::{write_rankings, write_rankings_to};
