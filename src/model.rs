//! Data model - relational rows and embedded documents
//!
//! The relational side mirrors the eight PostgreSQL tables one struct per
//! table. The document side is the denormalized shape stored in MongoDB:
//! one document per store (catalog) and one per sale (transactions).

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used in SQL literals and COPY streams
pub const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp layout used inside Extended-JSON `$date` values
pub const JSON_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Round a monetary amount to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ========== Relational Rows ==========

/// A single column value as handed to a SQL writer.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue<'a> {
    Null,
    Int(i64),
    /// Fixed two-decimal amount (DECIMAL columns)
    Money(f64),
    Text(&'a str),
    Timestamp(NaiveDateTime),
}

/// A row type that maps onto exactly one table.
pub trait TableRow {
    /// Lower-case table name (PostgreSQL folds unquoted identifiers)
    const TABLE: &'static str;
    /// Column names in insertion order
    const COLUMNS: &'static [&'static str];

    /// Column values, aligned with `COLUMNS`
    fn values(&self) -> Vec<SqlValue<'_>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub price: f64,
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub store_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub store_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: i32,
    pub sale_timestamp: NaiveDateTime,
    pub customer_id: i32,
    pub store_id: i32,
    pub employee_id: i32,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub sale_id: i32,
    pub line_number: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

impl TableRow for Category {
    const TABLE: &'static str = "category";
    const COLUMNS: &'static [&'static str] = &["category_id", "name"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![SqlValue::Int(self.category_id.into()), SqlValue::Text(&self.name)]
    }
}

impl TableRow for Product {
    const TABLE: &'static str = "product";
    const COLUMNS: &'static [&'static str] = &["product_id", "name", "price", "category_id"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.product_id.into()),
            SqlValue::Text(&self.name),
            SqlValue::Money(self.price),
            SqlValue::Int(self.category_id.into()),
        ]
    }
}

impl TableRow for Store {
    const TABLE: &'static str = "store";
    const COLUMNS: &'static [&'static str] = &["store_id", "name", "address"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.store_id.into()),
            SqlValue::Text(&self.name),
            SqlValue::Text(&self.address),
        ]
    }
}

impl TableRow for Employee {
    const TABLE: &'static str = "employee";
    const COLUMNS: &'static [&'static str] =
        &["employee_id", "first_name", "last_name", "position", "store_id"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.employee_id.into()),
            SqlValue::Text(&self.first_name),
            SqlValue::Text(&self.last_name),
            SqlValue::Text(&self.position),
            SqlValue::Int(self.store_id.into()),
        ]
    }
}

impl TableRow for Customer {
    const TABLE: &'static str = "customer";
    const COLUMNS: &'static [&'static str] = &["customer_id", "first_name", "last_name", "email"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.customer_id.into()),
            SqlValue::Text(&self.first_name),
            SqlValue::Text(&self.last_name),
            SqlValue::Text(&self.email),
        ]
    }
}

impl TableRow for InventoryItem {
    const TABLE: &'static str = "inventory";
    const COLUMNS: &'static [&'static str] = &["store_id", "product_id", "quantity"];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.store_id.into()),
            SqlValue::Int(self.product_id.into()),
            SqlValue::Int(self.quantity.into()),
        ]
    }
}

impl TableRow for Sale {
    const TABLE: &'static str = "sale";
    const COLUMNS: &'static [&'static str] = &[
        "sale_id",
        "sale_timestamp",
        "customer_id",
        "store_id",
        "employee_id",
        "total_amount",
    ];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.sale_id.into()),
            SqlValue::Timestamp(self.sale_timestamp),
            SqlValue::Int(self.customer_id.into()),
            SqlValue::Int(self.store_id.into()),
            SqlValue::Int(self.employee_id.into()),
            SqlValue::Money(self.total_amount),
        ]
    }
}

impl TableRow for SaleLine {
    const TABLE: &'static str = "saleline";
    const COLUMNS: &'static [&'static str] = &[
        "sale_id",
        "line_number",
        "product_id",
        "quantity",
        "unit_price",
        "line_total",
    ];

    fn values(&self) -> Vec<SqlValue<'_>> {
        vec![
            SqlValue::Int(self.sale_id.into()),
            SqlValue::Int(self.line_number.into()),
            SqlValue::Int(self.product_id.into()),
            SqlValue::Int(self.quantity.into()),
            SqlValue::Money(self.unit_price),
            SqlValue::Money(self.line_total),
        ]
    }
}

/// Employee roles handed out by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Cajero,
    Vendedor,
    Gerente,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Cajero => "Cajero",
            Position::Vendedor => "Vendedor",
            Position::Gerente => "Gerente",
        }
    }

    pub fn all() -> &'static [Position] {
        &[Position::Cajero, Position::Vendedor, Position::Gerente]
    }
}

/// All eight tables of the relational model.
///
/// Produced either by the generator or by renormalizing documents.
/// Field order matches foreign-key dependency order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetailTables {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub stores: Vec<Store>,
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<Sale>,
    pub sale_lines: Vec<SaleLine>,
}

impl RetailTables {
    /// Row count per table, in dependency order
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (Category::TABLE, self.categories.len()),
            (Product::TABLE, self.products.len()),
            (Store::TABLE, self.stores.len()),
            (Employee::TABLE, self.employees.len()),
            (Customer::TABLE, self.customers.len()),
            (InventoryItem::TABLE, self.inventory.len()),
            (Sale::TABLE, self.sales.len()),
            (SaleLine::TABLE, self.sale_lines.len()),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.row_counts().iter().map(|(_, n)| n).sum()
    }
}

// ========== Documents ==========

/// Product as embedded in inventory entries and sale lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDoc {
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDoc {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDoc {
    pub product: ProductDoc,
    pub quantity: i32,
}

/// Catalog document: one per store with staff and stock embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDoc {
    pub store_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub employees: Vec<EmployeeDoc>,
    #[serde(default)]
    pub inventory: Vec<InventoryDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDoc {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLineDoc {
    pub product: ProductDoc,
    pub quantity: i32,
    pub line_total: f64,
}

/// Sale timestamp, either Extended JSON (`{"$date": ...}`) or a plain string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocTimestamp {
    Extended {
        #[serde(rename = "$date")]
        date: String,
    },
    Plain(String),
}

impl DocTimestamp {
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        DocTimestamp::Extended {
            date: dt.format(JSON_TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            DocTimestamp::Extended { date } => date,
            DocTimestamp::Plain(s) => s,
        }
    }

    /// Parse as a naive ISO-8601 timestamp, dropping any trailing `Z`.
    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        let raw = self.raw().trim();
        let raw = raw.strip_suffix('Z').unwrap_or(raw);
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| Error::Document(format!("Invalid timestamp: {}", self.raw())))
    }
}

/// Transaction document: one per sale with every party embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDoc {
    pub timestamp: DocTimestamp,
    pub store: StoreRef,
    pub employee: EmployeeRef,
    pub customer: CustomerDoc,
    pub lines: Vec<SaleLineDoc>,
    pub total_amount: f64,
}
