//! Shared fixtures: a small Northwind slice on disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use northwind::api::QueryService;
use northwind::executor::{SharedStore, SqliteStore};
use northwind::geo::{GeoClient, GeoConfig};
use northwind::http_server::{AppState, HttpServer, HttpServerConfig};
use northwind::loader::{initialize_schema, BulkLoader, LoadReport};
use northwind::observability::MetricsRegistry;
use northwind::schema::SchemaRegistry;

pub const PRODUCTS: &str = "\
ProductID;ProductName;SupplierID;CategoryID;QuantityPerUnit;UnitPrice;UnitsInStock;UnitsOnOrder;ReorderLevel;Discontinued
1;Chai;1;1;10 boxes x 20 bags;18;39;0;10;0
2;Chang;1;1;24 - 12 oz bottles;19;17;40;25;0
3;Aniseed Syrup;1;2;12 - 550 ml bottles;10;13;70;25;0
4;Chef Anton's Cajun Seasoning;2;2;48 - 6 oz jars;22;53;0;0;0
5;Chef Anton's Gumbo Mix;2;2;36 boxes;21.35;0;0;0;1
";

pub const CUSTOMERS: &str = "\
CustomerID;CompanyName;ContactName;ContactTitle;Address;City;Region;PostalCode;Country;Phone;Fax
ALFKI;Alfreds Futterkiste;Maria Anders;Sales Representative;Obere Str. 57;Berlin;;12209;Germany;030-0074321;030-0076545
ANATR;Ana Trujillo Emparedados y helados;Ana Trujillo;Owner;Avda. de la Constitucion 2222;Mexico D.F.;;05021;Mexico;(5) 555-4729;(5) 555-3745
AROUT;Around the Horn;Thomas Hardy;Sales Representative;120 Hanover Sq.;London;;WA1 1DP;UK;(171) 555-7788;(171) 555-6750
";

pub const ORDERS: &str = "\
OrderID;CustomerID;EmployeeID;OrderDate;RequiredDate;ShippedDate;ShipVia;Freight;ShipName;ShipAddress;ShipCity;ShipRegion;ShipPostalCode;ShipCountry
10248;ALFKI;5;1996-07-04;1996-08-01;1996-07-16;3;32.38;Vins et alcools Chevalier;59 rue de l'Abbaye;Reims;;51100;France
10249;ANATR;6;1996-07-05;1996-08-16;1996-07-10;1;11.61;Toms Spezialitaten;Luisenstr. 48;Munster;;44087;Germany
10250;AROUT;4;1996-07-08;1996-08-05;;2;65.83;Hanari Carnes;Rua do Paco, 67;Rio de Janeiro;RJ;05454-876;Brazil
";

pub const ORDER_DETAILS: &str = "\
OrderID;ProductID;UnitPrice;Quantity;Discount
10248;1;14;12;0
10248;2;10;10;0
10249;3;20;9;0
";

pub const CATEGORIES: &str = "\
CategoryID;CategoryName;Description
1;Beverages;Soft drinks, coffees, teas, beers, and ales
2;Condiments;Sweet and savory sauces, relishes, spreads, and seasonings
";

/// A loaded SQLite file in a temporary directory
pub struct Fixture {
    pub dir: TempDir,
    pub store: SharedStore,
    pub metrics: Arc<MetricsRegistry>,
    pub report: LoadReport,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("rawData");
        write_sources(&data_dir);

        let store: SharedStore = Arc::new(SqliteStore::open(dir.path().join("db.db")).unwrap());
        let registry = SchemaRegistry::northwind();
        initialize_schema(store.as_ref(), &registry, false).unwrap();

        let metrics = Arc::new(MetricsRegistry::new());
        let report = BulkLoader::new(store.clone(), registry, &data_dir, metrics.clone()).load_all();

        Self {
            dir,
            store,
            metrics,
            report,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("rawData")
    }

    pub fn service(&self) -> QueryService {
        QueryService::new(self.store.clone(), self.metrics.clone())
    }

    pub fn router(&self) -> Router {
        let geo = GeoClient::new(GeoConfig::default()).unwrap();
        let state = AppState::new(self.service(), geo);
        HttpServer::new(HttpServerConfig::default(), state).router()
    }
}

pub fn write_sources(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for (table, body) in [
        ("Products", PRODUCTS),
        ("Customers", CUSTOMERS),
        ("Orders", ORDERS),
        ("OrderDetails", ORDER_DETAILS),
        ("Categories", CATEGORIES),
    ] {
        fs::write(dir.join(format!("{}.csv", table)), body).unwrap();
    }
}
