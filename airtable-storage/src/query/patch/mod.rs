mod update_record;

pub use update_record::*;
