//! Denormalization - relational tables to documents
//!
//! Builds the two document collections from the relational dataset:
//! - catalog: one document per store with employees and inventory embedded
//! - sales: one document per sale with store, employee, customer and lines
//!
//! Foreign keys are resolved by id lookup; a dangling key is a mapping error.

use crate::model::{
    CustomerDoc, DocTimestamp, EmployeeDoc, EmployeeRef, InventoryDoc, ProductDoc, RetailTables,
    SaleDoc, SaleLineDoc, StoreDoc, StoreRef,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Id lookups over the relational tables
struct Lookup<'a> {
    categories: HashMap<i32, &'a str>,
    products: HashMap<i32, &'a crate::model::Product>,
}

impl<'a> Lookup<'a> {
    fn new(tables: &'a RetailTables) -> Self {
        Self {
            categories: tables.categories.iter().map(|c| (c.category_id, c.name.as_str())).collect(),
            products: tables.products.iter().map(|p| (p.product_id, p)).collect(),
        }
    }

    fn product(&self, product_id: i32) -> Result<ProductDoc> {
        let product = self
            .products
            .get(&product_id)
            .ok_or_else(|| Error::Mapping(format!("unknown product_id {}", product_id)))?;
        let category = self.categories.get(&product.category_id).ok_or_else(|| {
            Error::Mapping(format!(
                "product {} references unknown category_id {}",
                product_id, product.category_id
            ))
        })?;
        Ok(ProductDoc {
            name: product.name.clone(),
            category: category.to_string(),
            price: product.price,
        })
    }
}

/// One catalog document per store, in store order
pub fn build_store_docs(tables: &RetailTables) -> Result<Vec<StoreDoc>> {
    let lookup = Lookup::new(tables);

    tables
        .stores
        .iter()
        .map(|store| {
            let inventory = tables
                .inventory
                .iter()
                .filter(|item| item.store_id == store.store_id)
                .map(|item| {
                    Ok(InventoryDoc {
                        product: lookup.product(item.product_id)?,
                        quantity: item.quantity,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let employees = tables
                .employees
                .iter()
                .filter(|e| e.store_id == store.store_id)
                .map(|e| EmployeeDoc {
                    first_name: e.first_name.clone(),
                    last_name: e.last_name.clone(),
                    position: e.position.clone(),
                })
                .collect();

            Ok(StoreDoc {
                store_name: store.name.clone(),
                address: store.address.clone(),
                employees,
                inventory,
            })
        })
        .collect()
}

/// One transaction document per sale, in sale order
pub fn build_sale_docs(tables: &RetailTables) -> Result<Vec<SaleDoc>> {
    let lookup = Lookup::new(tables);
    let stores: HashMap<i32, _> = tables.stores.iter().map(|s| (s.store_id, s)).collect();
    let employees: HashMap<i32, _> = tables.employees.iter().map(|e| (e.employee_id, e)).collect();
    let customers: HashMap<i32, _> = tables.customers.iter().map(|c| (c.customer_id, c)).collect();

    let mut lines_by_sale: HashMap<i32, Vec<&crate::model::SaleLine>> = HashMap::new();
    for line in &tables.sale_lines {
        lines_by_sale.entry(line.sale_id).or_default().push(line);
    }

    let mut docs = Vec::with_capacity(tables.sales.len());
    for sale in &tables.sales {
        let store = stores.get(&sale.store_id).ok_or_else(|| {
            Error::Mapping(format!("sale {} references unknown store_id {}", sale.sale_id, sale.store_id))
        })?;
        let employee = employees.get(&sale.employee_id).ok_or_else(|| {
            Error::Mapping(format!(
                "sale {} references unknown employee_id {}",
                sale.sale_id, sale.employee_id
            ))
        })?;
        let customer = customers.get(&sale.customer_id).ok_or_else(|| {
            Error::Mapping(format!(
                "sale {} references unknown customer_id {}",
                sale.sale_id, sale.customer_id
            ))
        })?;

        let mut lines = Vec::new();
        if let Some(sale_lines) = lines_by_sale.get(&sale.sale_id) {
            for line in sale_lines {
                lines.push(SaleLineDoc {
                    product: lookup.product(line.product_id)?,
                    quantity: line.quantity,
                    line_total: line.line_total,
                });
            }
        }

        docs.push(SaleDoc {
            timestamp: DocTimestamp::from_datetime(sale.sale_timestamp),
            store: StoreRef { name: store.name.clone() },
            employee: EmployeeRef {
                first_name: employee.first_name.clone(),
                last_name: employee.last_name.clone(),
            },
            customer: CustomerDoc {
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                email: customer.email.clone(),
            },
            lines,
            total_amount: sale.total_amount,
        });
    }
    Ok(docs)
}

/// Write `docs` as pretty-printed UTF-8 JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, docs: &T) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, docs)?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Build both collections and write them to disk
pub fn write_documents(tables: &RetailTables, catalog_path: &Path, sales_path: &Path) -> Result<(usize, usize)> {
    let store_docs = build_store_docs(tables)?;
    let sale_docs = build_sale_docs(tables)?;
    write_json(catalog_path, &store_docs)?;
    write_json(sales_path, &sale_docs)?;
    tracing::info!(
        "wrote {} store documents to {} and {} sale documents to {}",
        store_docs.len(),
        catalog_path.display(),
        sale_docs.len(),
        sales_path.display()
    );
    Ok((store_docs.len(), sale_docs.len()))
}
