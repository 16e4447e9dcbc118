//! DDL rendering for the one-shot schema create/drop

use super::types::TableDescriptor;

/// Quotes an identifier for SQLite
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `CREATE TABLE IF NOT EXISTS` for a descriptor
///
/// Only single-column identities become a `PRIMARY KEY`; composite
/// identities are logical and left unconstrained, as in the source data.
pub fn create_table(table: &TableDescriptor) -> String {
    let single_identity = table.identity_column().map(|c| c.name);

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let mut def = format!("{} {}", quote_ident(col.name), col.column_type.sql_type());
            if Some(col.name) == single_identity {
                def.push_str(" PRIMARY KEY");
            } else if !col.nullable {
                def.push_str(" NOT NULL");
            } else {
                def.push_str(" NULL");
            }
            def
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table.name),
        columns.join(", ")
    )
}

/// `DROP TABLE IF EXISTS` for a descriptor
pub fn drop_table(table: &TableDescriptor) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table.name))
}
