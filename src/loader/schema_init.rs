//! One-shot schema create / drop

use crate::executor::{ExecutorResult, Store};
use crate::observability::{Event, Logger};
use crate::schema::{ddl, SchemaRegistry};

/// Creates every table that does not exist yet.
///
/// With `reset`, all tables (including the audit log) are dropped first,
/// in reverse creation order.
pub fn initialize_schema(
    store: &dyn Store,
    registry: &SchemaRegistry,
    reset: bool,
) -> ExecutorResult<usize> {
    if reset {
        for table in registry.tables().iter().rev() {
            store.execute(&ddl::drop_table(table), &[])?;
        }
    }
    for table in registry.tables() {
        store.execute(&ddl::create_table(table), &[])?;
    }

    let count = registry.tables().len();
    Logger::info(
        Event::SchemaInitialized,
        &[
            ("reset", if reset { "true" } else { "false" }),
            ("tables", count.to_string().as_str()),
        ],
    );
    Ok(count)
}
