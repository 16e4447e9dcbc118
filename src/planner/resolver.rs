//! Query Resolver
//!
//! Maps a logical table plus request shape to a [`ResolvedQuery`]. Each
//! table owns a [`TableStrategy`]: a small set of function pointers for
//! list / get-by-id / search / count. Operations a table does not support
//! are `None` in its strategy, so an unsupported request is a lookup miss,
//! not a fallthrough branch.
//!
//! The `Orders` table lists through a pre-joined aggregate projecting
//! per-order product count, total quantity and total price from
//! `OrderDetails`; every other table is a plain full-row projection.

use std::collections::HashMap;

use crate::schema::ddl::quote_ident;
use crate::schema::{ColumnDef, ColumnType, SchemaRegistry, TableDescriptor};

use super::errors::{PlannerError, PlannerResult};
use super::query::{Pagination, QueryMode, QueryRequest};
use super::sql::{QueryKind, ResolvedQuery, SelectBuilder, SqlParam};

type ListFn = fn(&'static TableDescriptor, Pagination) -> ResolvedQuery;
type GetByIdFn = fn(&'static TableDescriptor, &ColumnDef, SqlParam) -> ResolvedQuery;
type SearchFn = fn(&'static TableDescriptor, &ColumnDef, &str) -> ResolvedQuery;
type CountFn = fn(&'static TableDescriptor) -> ResolvedQuery;

/// Per-table query construction
#[derive(Clone, Copy)]
pub struct TableStrategy {
    pub list: ListFn,
    pub get_by_id: Option<GetByIdFn>,
    pub search: Option<SearchFn>,
    pub count: CountFn,
}

impl TableStrategy {
    /// Derives the strategy for a table from its descriptor
    fn for_table(table: &TableDescriptor) -> Self {
        let aggregate = table.name == "Orders";
        Self {
            list: if aggregate { order_aggregate::list } else { plain::list },
            get_by_id: table.identity_column().map(|_| {
                if aggregate {
                    order_aggregate::get_by_id as GetByIdFn
                } else {
                    plain::get_by_id as GetByIdFn
                }
            }),
            search: table.searchable_column().map(|_| plain::search as SearchFn),
            count: plain::count,
        }
    }
}

/// Resolves abstract requests into executable statements
pub struct QueryResolver {
    registry: SchemaRegistry,
    strategies: HashMap<&'static str, TableStrategy>,
}

impl QueryResolver {
    /// Builds a resolver over the given registry
    pub fn new(registry: SchemaRegistry) -> Self {
        let strategies = registry
            .tables()
            .iter()
            .map(|t| (t.name, TableStrategy::for_table(t)))
            .collect();
        Self {
            registry,
            strategies,
        }
    }

    /// Returns the underlying registry
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    fn lookup(&self, table: &str) -> PlannerResult<(&'static TableDescriptor, TableStrategy)> {
        let descriptor = self.registry.describe(table)?;
        let strategy = self
            .strategies
            .get(descriptor.name)
            .copied()
            .ok_or_else(|| PlannerError::unknown_table(table))?;
        Ok((descriptor, strategy))
    }

    /// Dispatches a request to the matching resolve operation
    pub fn resolve(&self, request: &QueryRequest) -> PlannerResult<ResolvedQuery> {
        match &request.mode {
            QueryMode::List => self.resolve_list(&request.table, request.pagination),
            QueryMode::GetById { id } => self.resolve_get_by_id(&request.table, id),
            QueryMode::Search { key, substring } => {
                self.resolve_search(&request.table, key.as_deref(), substring)
            }
        }
    }

    /// Paginated listing
    pub fn resolve_list(&self, table: &str, pagination: Pagination) -> PlannerResult<ResolvedQuery> {
        let (descriptor, strategy) = self.lookup(table)?;
        Ok((strategy.list)(descriptor, pagination))
    }

    /// Equality on the identity column.
    ///
    /// Integer identities must parse as `i64`; failure is a
    /// resolution error.
    pub fn resolve_get_by_id(&self, table: &str, id: &str) -> PlannerResult<ResolvedQuery> {
        let (descriptor, strategy) = self.lookup(table)?;
        let get_by_id = strategy
            .get_by_id
            .ok_or_else(|| PlannerError::no_identity(descriptor.name))?;
        let column = descriptor
            .identity_column()
            .ok_or_else(|| PlannerError::no_identity(descriptor.name))?;

        let param = match column.column_type {
            ColumnType::Integer => id
                .trim()
                .parse::<i64>()
                .map(SqlParam::Integer)
                .map_err(|_| PlannerError::invalid_id(descriptor.name, id, "integer"))?,
            _ => SqlParam::Text(id.to_string()),
        };

        Ok(get_by_id(descriptor, column, param))
    }

    /// Substring match on the table's search column.
    ///
    /// `key`, when given, must name that column exactly.
    pub fn resolve_search(
        &self,
        table: &str,
        key: Option<&str>,
        substring: &str,
    ) -> PlannerResult<ResolvedQuery> {
        let (descriptor, strategy) = self.lookup(table)?;
        let search = strategy
            .search
            .ok_or_else(|| PlannerError::not_searchable(descriptor.name))?;
        let column = descriptor
            .searchable_column()
            .ok_or_else(|| PlannerError::not_searchable(descriptor.name))?;

        if let Some(key) = key {
            if key != column.name {
                return Err(PlannerError::invalid_search_key(
                    descriptor.name,
                    key,
                    column.name,
                ));
            }
        }

        Ok(search(descriptor, column, substring))
    }

    /// Total row count, no predicate
    pub fn resolve_count(&self, table: &str) -> PlannerResult<ResolvedQuery> {
        let (descriptor, strategy) = self.lookup(table)?;
        Ok((strategy.count)(descriptor))
    }
}

impl Default for QueryResolver {
    fn default() -> Self {
        Self::new(SchemaRegistry::northwind())
    }
}

/// Joins quoted identity columns, optionally qualified by an alias
fn identity_list(table: &TableDescriptor, alias: Option<&str>) -> String {
    table
        .identity
        .iter()
        .map(|c| qualify(alias, c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn qualify(alias: Option<&str>, column: &str) -> String {
    match alias {
        Some(a) => format!("{}.{}", a, quote_ident(column)),
        None => quote_ident(column),
    }
}

mod plain {
    use super::*;

    fn head(table: &TableDescriptor) -> String {
        format!("SELECT * FROM {}", quote_ident(table.name))
    }

    pub fn list(table: &'static TableDescriptor, pagination: Pagination) -> ResolvedQuery {
        SelectBuilder::new(table.name, QueryKind::List, head(table))
            .order_by(identity_list(table, None))
            .paginate(pagination)
            .build()
    }

    pub fn get_by_id(
        table: &'static TableDescriptor,
        column: &ColumnDef,
        id: SqlParam,
    ) -> ResolvedQuery {
        SelectBuilder::new(table.name, QueryKind::GetById, head(table))
            .filter(format!("{} = ?", quote_ident(column.name)), id)
            .build()
    }

    pub fn search(
        table: &'static TableDescriptor,
        column: &ColumnDef,
        substring: &str,
    ) -> ResolvedQuery {
        SelectBuilder::new(table.name, QueryKind::Search, head(table))
            .filter(
                format!("{} LIKE ?", quote_ident(column.name)),
                SqlParam::Text(format!("%{}%", substring)),
            )
            .build()
    }

    pub fn count(table: &'static TableDescriptor) -> ResolvedQuery {
        SelectBuilder::new(
            table.name,
            QueryKind::Count,
            format!("SELECT COUNT(1) AS \"total\" FROM {}", quote_ident(table.name)),
        )
        .build()
    }
}

mod order_aggregate {
    use super::*;

    const ORDER_ALIAS: &str = "o";
    const DETAIL_ALIAS: &str = "od";
    const DETAILS_TABLE: &str = "OrderDetails";

    fn order_columns(table: &TableDescriptor) -> String {
        table
            .column_names()
            .map(|c| qualify(Some(ORDER_ALIAS), c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn head(table: &TableDescriptor) -> String {
        let od = |c: &str| qualify(Some(DETAIL_ALIAS), c);
        format!(
            "SELECT {cols}, COUNT(DISTINCT {pid}) AS \"ProductCount\", SUM({qty}) AS \"TotalQuantity\", \
             SUM({price} * {qty}) AS \"TotalPrice\" FROM {orders} AS {o} LEFT JOIN {details} AS {d} \
             ON {o_id} = {d_id}",
            cols = order_columns(table),
            pid = od("ProductID"),
            qty = od("Quantity"),
            price = od("UnitPrice"),
            orders = quote_ident(table.name),
            o = ORDER_ALIAS,
            details = quote_ident(DETAILS_TABLE),
            d = DETAIL_ALIAS,
            o_id = qualify(Some(ORDER_ALIAS), "OrderID"),
            d_id = od("OrderID"),
        )
    }

    pub fn list(table: &'static TableDescriptor, pagination: Pagination) -> ResolvedQuery {
        SelectBuilder::new(table.name, QueryKind::List, head(table))
            .group_by(order_columns(table))
            .order_by(identity_list(table, Some(ORDER_ALIAS)))
            .paginate(pagination)
            .build()
    }

    pub fn get_by_id(
        table: &'static TableDescriptor,
        column: &ColumnDef,
        id: SqlParam,
    ) -> ResolvedQuery {
        SelectBuilder::new(table.name, QueryKind::GetById, head(table))
            .filter(format!("{} = ?", qualify(Some(ORDER_ALIAS), column.name)), id)
            .group_by(order_columns(table))
            .build()
    }
}
