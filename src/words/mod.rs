mod catalog;
mod dataset;
mod load;
mod parse;

pub use catalog::{Catalog, TextEntry};
pub use dataset::{Dataset, RecordError, RejectedRecord, WordRecord};
pub use load::{LoadRequest, load_dataset};
