//! Logging helpers.

use slog::Logger;

/// Extension trait for `slog::Logger`
pub trait LoggerExtensions {
    /// Create a new child logger with a `src` key containing the component name.
    fn new_with_component_name<T>(&self) -> Self;

    /// Create a new child logger with a `table` key containing the given table name.
    fn new_with_table_name(&self, table_name: &str) -> Self;
}

impl LoggerExtensions for Logger {
    fn new_with_component_name<T>(&self) -> Self {
        self.new(slog::o!("src" => component_name::<T>()))
    }

    fn new_with_table_name(&self, table_name: &str) -> Self {
        self.new(slog::o!("table" => table_name.to_owned()))
    }
}

/// Last path segment of the type name, generic parameters stripped.
fn component_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let without_generic = type_name.split('<').next().unwrap_or(type_name);

    without_generic.rsplit("::").next().unwrap_or(without_generic)
}
