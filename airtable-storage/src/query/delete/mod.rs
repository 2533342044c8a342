mod delete_record;

pub use delete_record::*;
