//! Storage Layer - PostgreSQL and MongoDB backends
//!
//! PostgreSQL holds the relational model:
//! - category, product, store, employee, customer
//! - inventory(store_id, product_id, quantity)
//! - sale, saleline
//!
//! MongoDB holds the document model in two collections: `stores` (catalog)
//! and `sales` (transactions).

pub mod mongo;
pub mod postgres;
pub mod schema;

pub use self::mongo::{to_documents, MongoStore};
pub use self::postgres::{PostgresStore, TableCount};
