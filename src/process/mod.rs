pub mod convert;
pub mod extract;

pub use convert::{decode_magnitude, decode_percentage};
pub use extract::{collect_rankings, extract, Document, Node, Rankings};
