//! The fixed Northwind catalogue
//!
//! Eleven business tables plus the `ResponseLogs` audit table. Column
//! layout and nullability follow the dataset's DDL.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnDef, ColumnType, TableDescriptor};

use super::types::ColumnType::{Blob, Integer, Real, Text};

/// Name of the append-only audit table
pub const RESPONSE_LOGS: &str = "ResponseLogs";

const EMPLOYEES: &[ColumnDef] = &[
    ColumnDef::required("EmployeeID", Integer),
    ColumnDef::optional("LastName", Text),
    ColumnDef::optional("FirstName", Text),
    ColumnDef::optional("Title", Text),
    ColumnDef::optional("TitleOfCourtesy", Text),
    ColumnDef::optional("BirthDate", Text),
    ColumnDef::optional("HireDate", Text),
    ColumnDef::optional("Address", Text),
    ColumnDef::optional("City", Text),
    ColumnDef::optional("Region", Text),
    ColumnDef::optional("PostalCode", Text),
    ColumnDef::optional("Country", Text),
    ColumnDef::optional("HomePhone", Text),
    ColumnDef::optional("Extension", Text),
    ColumnDef::optional("Photo", Blob),
    ColumnDef::optional("Notes", Text),
    ColumnDef::optional("ReportsTo", Integer),
];

const CATEGORIES: &[ColumnDef] = &[
    ColumnDef::required("CategoryID", Integer),
    ColumnDef::optional("CategoryName", Text),
    ColumnDef::optional("Description", Text),
];

const CUSTOMERS: &[ColumnDef] = &[
    ColumnDef::required("CustomerID", Text),
    ColumnDef::optional("CompanyName", Text),
    ColumnDef::optional("ContactName", Text),
    ColumnDef::optional("ContactTitle", Text),
    ColumnDef::optional("Address", Text),
    ColumnDef::optional("City", Text),
    ColumnDef::optional("Region", Text),
    ColumnDef::optional("PostalCode", Text),
    ColumnDef::optional("Country", Text),
    ColumnDef::optional("Phone", Text),
    ColumnDef::optional("Fax", Text),
];

const SHIPPERS: &[ColumnDef] = &[
    ColumnDef::required("ShipperID", Integer),
    ColumnDef::optional("CompanyName", Text),
    ColumnDef::optional("Phone", Text),
];

const SUPPLIES: &[ColumnDef] = &[
    ColumnDef::required("SupplierID", Integer),
    ColumnDef::optional("CompanyName", Text),
    ColumnDef::optional("ContactName", Text),
    ColumnDef::optional("ContactTitle", Text),
    ColumnDef::optional("Address", Text),
    ColumnDef::optional("City", Text),
    ColumnDef::optional("Region", Text),
    ColumnDef::optional("PostalCode", Text),
    ColumnDef::optional("Country", Text),
    ColumnDef::optional("Phone", Text),
    ColumnDef::optional("Fax", Text),
    ColumnDef::optional("HomePage", Text),
];

const ORDERS: &[ColumnDef] = &[
    ColumnDef::required("OrderID", Integer),
    ColumnDef::optional("CustomerID", Text),
    ColumnDef::required("EmployeeID", Integer),
    ColumnDef::optional("OrderDate", Text),
    ColumnDef::optional("RequiredDate", Text),
    ColumnDef::optional("ShippedDate", Text),
    ColumnDef::optional("ShipVia", Integer),
    ColumnDef::required("Freight", Real),
    ColumnDef::optional("ShipName", Text),
    ColumnDef::optional("ShipAddress", Text),
    ColumnDef::optional("ShipCity", Text),
    ColumnDef::optional("ShipRegion", Text),
    ColumnDef::optional("ShipPostalCode", Text),
    ColumnDef::optional("ShipCountry", Text),
];

const PRODUCTS: &[ColumnDef] = &[
    ColumnDef::required("ProductID", Integer),
    ColumnDef::optional("ProductName", Text),
    ColumnDef::required("SupplierID", Integer),
    ColumnDef::required("CategoryID", Integer),
    ColumnDef::optional("QuantityPerUnit", Text),
    ColumnDef::required("UnitPrice", Real),
    ColumnDef::required("UnitsInStock", Integer),
    ColumnDef::required("UnitsOnOrder", Integer),
    ColumnDef::required("ReorderLevel", Integer),
    ColumnDef::required("Discontinued", Integer),
];

// OrderID is text here while Orders.OrderID is an integer; SQLite's
// affinity rules make the join compare numerically.
const ORDER_DETAILS: &[ColumnDef] = &[
    ColumnDef::optional("OrderID", Text),
    ColumnDef::required("ProductID", Integer),
    ColumnDef::required("UnitPrice", Real),
    ColumnDef::required("Quantity", Integer),
    ColumnDef::required("Discount", Real),
];

const REGIONS: &[ColumnDef] = &[
    ColumnDef::required("RegionID", Integer),
    ColumnDef::optional("RegionDescription", Text),
];

const TERRITORIES: &[ColumnDef] = &[
    ColumnDef::required("TerritoryID", Text),
    ColumnDef::optional("TerritoryDescription", Text),
    ColumnDef::required("RegionID", Integer),
];

const EMPLOYEE_TERRITORIES: &[ColumnDef] = &[
    ColumnDef::required("EmployeeID", Integer),
    ColumnDef::optional("TerritoryID", Text),
];

const RESPONSE_LOG_COLUMNS: &[ColumnDef] = &[
    ColumnDef::optional("SessionID", Text),
    ColumnDef::optional("SessionIP", Text),
    ColumnDef::optional("queriedAt", Text),
    ColumnDef::optional("Query", Text),
    ColumnDef::optional("RowsReturned", Integer),
    ColumnDef::optional("ResponseTime", Real),
];

/// All tables, in creation order
pub const TABLES: &[TableDescriptor] = &[
    TableDescriptor {
        name: "Employees",
        columns: EMPLOYEES,
        identity: &["EmployeeID"],
        search_column: None,
        route: Some("employees"),
    },
    TableDescriptor {
        name: "Categories",
        columns: CATEGORIES,
        identity: &["CategoryID"],
        search_column: None,
        route: Some("categories"),
    },
    TableDescriptor {
        name: "Customers",
        columns: CUSTOMERS,
        identity: &["CustomerID"],
        search_column: Some("CompanyName"),
        route: Some("customers"),
    },
    TableDescriptor {
        name: "Shippers",
        columns: SHIPPERS,
        identity: &["ShipperID"],
        search_column: None,
        route: Some("shippers"),
    },
    TableDescriptor {
        name: "Supplies",
        columns: SUPPLIES,
        identity: &["SupplierID"],
        search_column: None,
        route: Some("suppliers"),
    },
    TableDescriptor {
        name: "Orders",
        columns: ORDERS,
        identity: &["OrderID"],
        search_column: None,
        route: Some("orders"),
    },
    TableDescriptor {
        name: "Products",
        columns: PRODUCTS,
        identity: &["ProductID"],
        search_column: Some("ProductName"),
        route: Some("products"),
    },
    TableDescriptor {
        name: "OrderDetails",
        columns: ORDER_DETAILS,
        identity: &["OrderID", "ProductID"],
        search_column: None,
        route: None,
    },
    TableDescriptor {
        name: "Regions",
        columns: REGIONS,
        identity: &["RegionID"],
        search_column: None,
        route: Some("regions"),
    },
    TableDescriptor {
        name: "Territories",
        columns: TERRITORIES,
        identity: &["TerritoryID"],
        search_column: None,
        route: Some("territories"),
    },
    TableDescriptor {
        name: "EmployeeTerritories",
        columns: EMPLOYEE_TERRITORIES,
        identity: &["EmployeeID", "TerritoryID"],
        search_column: None,
        route: None,
    },
    TableDescriptor {
        name: RESPONSE_LOGS,
        columns: RESPONSE_LOG_COLUMNS,
        identity: &[],
        search_column: None,
        route: None,
    },
];

/// Read-only lookup over the fixed catalogue
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    by_name: HashMap<&'static str, &'static TableDescriptor>,
}

impl SchemaRegistry {
    /// Builds the registry over [`TABLES`]
    pub fn northwind() -> Self {
        let by_name = TABLES.iter().map(|t| (t.name, t)).collect();
        Self { by_name }
    }

    /// Describes a table by its exact (case-sensitive) name
    pub fn describe(&self, table_name: &str) -> SchemaResult<&'static TableDescriptor> {
        self.by_name
            .get(table_name)
            .copied()
            .ok_or_else(|| SchemaError::not_found(table_name))
    }

    /// Resolves an HTTP path segment to its table
    pub fn by_route(&self, route: &str) -> SchemaResult<&'static TableDescriptor> {
        TABLES
            .iter()
            .find(|t| t.route == Some(route))
            .ok_or_else(|| SchemaError::not_found(route))
    }

    /// All tables in creation order
    pub fn tables(&self) -> &'static [TableDescriptor] {
        TABLES
    }

    /// Business tables (everything except the audit log)
    pub fn business_tables(&self) -> impl Iterator<Item = &'static TableDescriptor> {
        TABLES.iter().filter(|t| t.name != RESPONSE_LOGS)
    }

    /// Tables exposed as HTTP routes
    pub fn routed_tables(&self) -> impl Iterator<Item = &'static TableDescriptor> {
        TABLES.iter().filter(|t| t.route.is_some())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::northwind()
    }
}
