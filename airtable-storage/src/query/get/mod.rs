mod get_record;
mod list_records;

pub use get_record::*;
pub use list_records::*;
