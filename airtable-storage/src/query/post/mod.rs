mod create_record;

pub use create_record::*;
