//! Renormalization - documents back to relational tables
//!
//! Walks the catalog and sales documents once, assigning surrogate ids
//! through in-memory lookup tables:
//! - store: by store name, sequential
//! - employee: by (first name, last name, store id)
//! - category / product: by name, on first sight
//! - customer: by email, on first sight
//!
//! Every emitted row only references ids assigned earlier, so the tables can
//! be loaded in dependency order without violating foreign keys.

use crate::model::{
    round2, Category, Customer, Employee, InventoryItem, Product, ProductDoc, RetailTables, Sale,
    SaleDoc, SaleLine, Store, StoreDoc,
};
use crate::ui::StepProgress;
use crate::{Error, Result};
use std::collections::HashMap;

/// Counters collected while mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStats {
    pub stores: usize,
    pub sales: usize,
    /// Sale lines dropped because their product never appeared in a catalog
    pub skipped_lines: usize,
    /// Sales whose customer email had already been seen
    pub repeat_customers: usize,
}

impl std::fmt::Display for MappingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mapping Statistics:")?;
        writeln!(f, "  Stores: {}", self.stores)?;
        writeln!(f, "  Sales: {}", self.sales)?;
        writeln!(f, "  Repeat customers: {}", self.repeat_customers)?;
        write!(f, "  Skipped lines: {}", self.skipped_lines)
    }
}

/// Stateful document-to-relational mapper.
///
/// Map the catalog before the sales: sales resolve stores, employees and
/// products against ids assigned while walking the catalog.
#[derive(Debug, Default)]
pub struct RelationalMapper {
    tables: RetailTables,
    stats: MappingStats,
    store_ids: HashMap<String, i32>,
    employee_ids: HashMap<(String, String, i32), i32>,
    category_ids: HashMap<String, i32>,
    product_ids: HashMap<String, i32>,
    customer_ids: HashMap<String, i32>,
}

fn next_id(len: usize) -> Result<i32> {
    i32::try_from(len + 1).map_err(|_| Error::Mapping(format!("id {} overflows INT", len + 1)))
}

impl RelationalMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map catalog and sales documents in one go
    pub fn map(catalog: &[StoreDoc], sales: &[SaleDoc]) -> Result<(RetailTables, MappingStats)> {
        let mut mapper = Self::new();
        mapper.map_catalog(catalog)?;
        mapper.map_sales(sales)?;
        Ok(mapper.finish())
    }

    pub fn map_catalog(&mut self, catalog: &[StoreDoc]) -> Result<()> {
        for store_doc in catalog {
            let store_id = next_id(self.tables.stores.len())?;
            // A repeated name keeps the newest store for later lookups.
            self.store_ids.insert(store_doc.store_name.clone(), store_id);
            self.tables.stores.push(Store {
                store_id,
                name: store_doc.store_name.clone(),
                address: store_doc.address.clone(),
            });
            self.stats.stores += 1;

            for employee in &store_doc.employees {
                let employee_id = next_id(self.tables.employees.len())?;
                self.employee_ids.insert(
                    (employee.first_name.clone(), employee.last_name.clone(), store_id),
                    employee_id,
                );
                self.tables.employees.push(Employee {
                    employee_id,
                    first_name: employee.first_name.clone(),
                    last_name: employee.last_name.clone(),
                    position: employee.position.clone(),
                    store_id,
                });
            }

            for item in &store_doc.inventory {
                let product_id = self.product_id(&item.product)?;
                self.tables.inventory.push(InventoryItem {
                    store_id,
                    product_id,
                    quantity: item.quantity,
                });
            }
        }
        tracing::debug!(
            stores = self.tables.stores.len(),
            products = self.tables.products.len(),
            categories = self.tables.categories.len(),
            "catalog mapped"
        );
        Ok(())
    }

    /// Id of the product named in `doc`, registering it (and its category)
    /// on first sight.
    fn product_id(&mut self, doc: &ProductDoc) -> Result<i32> {
        let category_id = match self.category_ids.get(&doc.category) {
            Some(&id) => id,
            None => {
                let id = next_id(self.tables.categories.len())?;
                self.category_ids.insert(doc.category.clone(), id);
                self.tables.categories.push(Category {
                    category_id: id,
                    name: doc.category.clone(),
                });
                id
            }
        };

        if let Some(&id) = self.product_ids.get(&doc.name) {
            return Ok(id);
        }
        let id = next_id(self.tables.products.len())?;
        self.product_ids.insert(doc.name.clone(), id);
        self.tables.products.push(Product {
            product_id: id,
            name: doc.name.clone(),
            price: doc.price,
            category_id,
        });
        Ok(id)
    }

    pub fn map_sales(&mut self, sales: &[SaleDoc]) -> Result<()> {
        let progress = StepProgress::new(sales.len() as u64, "Mapping sales");

        for sale in sales {
            let customer_id = match self.customer_ids.get(&sale.customer.email) {
                Some(&id) => {
                    self.stats.repeat_customers += 1;
                    id
                }
                None => {
                    let id = next_id(self.tables.customers.len())?;
                    self.customer_ids.insert(sale.customer.email.clone(), id);
                    self.tables.customers.push(Customer {
                        customer_id: id,
                        first_name: sale.customer.first_name.clone(),
                        last_name: sale.customer.last_name.clone(),
                        email: sale.customer.email.clone(),
                    });
                    id
                }
            };

            let store_id = *self
                .store_ids
                .get(&sale.store.name)
                .ok_or_else(|| Error::Mapping(format!("sale references unknown store '{}'", sale.store.name)))?;
            let employee_key = (
                sale.employee.first_name.clone(),
                sale.employee.last_name.clone(),
                store_id,
            );
            let employee_id = *self.employee_ids.get(&employee_key).ok_or_else(|| {
                Error::Mapping(format!(
                    "sale references unknown employee '{} {}' at store '{}'",
                    sale.employee.first_name, sale.employee.last_name, sale.store.name
                ))
            })?;

            let sale_id = next_id(self.tables.sales.len())?;
            self.tables.sales.push(Sale {
                sale_id,
                sale_timestamp: sale.timestamp.to_datetime()?,
                customer_id,
                store_id,
                employee_id,
                total_amount: round2(sale.total_amount),
            });
            self.stats.sales += 1;

            let mut line_number = 1;
            for line in &sale.lines {
                let Some(&product_id) = self.product_ids.get(&line.product.name) else {
                    tracing::debug!("product '{}' not in catalog, line skipped", line.product.name);
                    self.stats.skipped_lines += 1;
                    continue;
                };
                self.tables.sale_lines.push(SaleLine {
                    sale_id,
                    line_number,
                    product_id,
                    quantity: line.quantity,
                    unit_price: line.product.price,
                    line_total: line.line_total,
                });
                line_number += 1;
            }
            progress.inc(1);
        }

        progress.finish();
        if self.stats.skipped_lines > 0 {
            tracing::warn!("{} sale lines skipped (product not in any catalog)", self.stats.skipped_lines);
        }
        Ok(())
    }

    pub fn finish(self) -> (RetailTables, MappingStats) {
        (self.tables, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{build_sale_docs, build_store_docs};
    use crate::generate::{generate, GeneratorConfig};
    use crate::model::{
        CustomerDoc, DocTimestamp, EmployeeDoc, EmployeeRef, InventoryDoc, SaleLineDoc, StoreRef,
    };
    use std::collections::HashSet;

    fn product(name: &str, category: &str, price: f64) -> ProductDoc {
        ProductDoc {
            name: name.into(),
            category: category.into(),
            price,
        }
    }

    fn catalog() -> Vec<StoreDoc> {
        vec![
            StoreDoc {
                store_name: "Norte".into(),
                address: "Calle 1".into(),
                employees: vec![EmployeeDoc {
                    first_name: "Ana".into(),
                    last_name: "Ruiz".into(),
                    position: "Cajero".into(),
                }],
                inventory: vec![
                    InventoryDoc { product: product("Lápiz", "Papelería", 5.0), quantity: 10 },
                    InventoryDoc { product: product("Balón", "Deportes", 250.0), quantity: 3 },
                ],
            },
            StoreDoc {
                store_name: "Sur".into(),
                address: String::new(),
                employees: vec![EmployeeDoc {
                    first_name: "Ana".into(),
                    last_name: "Ruiz".into(),
                    position: "Gerente".into(),
                }],
                inventory: vec![InventoryDoc { product: product("Lápiz", "Papelería", 5.0), quantity: 7 }],
            },
        ]
    }

    fn sale(store: &str, email: &str, lines: Vec<SaleLineDoc>) -> SaleDoc {
        let total: f64 = lines.iter().map(|l| l.line_total).sum();
        SaleDoc {
            timestamp: DocTimestamp::Extended { date: "2024-03-01T12:00:00Z".into() },
            store: StoreRef { name: store.into() },
            employee: EmployeeRef { first_name: "Ana".into(), last_name: "Ruiz".into() },
            customer: CustomerDoc {
                first_name: "Luis".into(),
                last_name: "Soto".into(),
                email: email.into(),
            },
            lines,
            total_amount: total,
        }
    }

    fn line(name: &str, price: f64, quantity: i32) -> SaleLineDoc {
        SaleLineDoc {
            product: product(name, "Papelería", price),
            quantity,
            line_total: round2(price * quantity as f64),
        }
    }

    #[test]
    fn test_catalog_ids_assigned_on_first_sight() {
        let (tables, stats) = RelationalMapper::map(&catalog(), &[]).unwrap();
        assert_eq!(stats.stores, 2);
        assert_eq!(tables.stores.iter().map(|s| s.store_id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(tables.categories.len(), 2);
        assert_eq!(tables.products.len(), 2);
        assert_eq!(tables.products[0].name, "Lápiz");
        assert_eq!(tables.products[1].category_id, 2);
        assert_eq!(tables.inventory.len(), 3);
        assert_eq!(tables.inventory[2], InventoryItem { store_id: 2, product_id: 1, quantity: 7 });
    }

    #[test]
    fn test_same_name_employees_are_per_store() {
        let (tables, _) = RelationalMapper::map(&catalog(), &[]).unwrap();
        assert_eq!(tables.employees.len(), 2);
        assert_eq!(tables.employees[0].store_id, 1);
        assert_eq!(tables.employees[1].store_id, 2);

        let sales = vec![sale("Sur", "luis@example.com", vec![line("Lápiz", 5.0, 2)])];
        let (tables, _) = RelationalMapper::map(&catalog(), &sales).unwrap();
        assert_eq!(tables.sales[0].employee_id, 2);
        assert_eq!(tables.sales[0].store_id, 2);
    }

    #[test]
    fn test_customers_deduplicated_by_email() {
        let sales = vec![
            sale("Norte", "luis@example.com", vec![line("Lápiz", 5.0, 1)]),
            sale("Norte", "otra@example.com", vec![line("Lápiz", 5.0, 1)]),
            sale("Sur", "luis@example.com", vec![line("Lápiz", 5.0, 3)]),
        ];
        let (tables, stats) = RelationalMapper::map(&catalog(), &sales).unwrap();
        assert_eq!(tables.customers.len(), 2);
        assert_eq!(stats.repeat_customers, 1);
        assert_eq!(tables.sales[2].customer_id, 1);
        assert_eq!(tables.sales.iter().map(|s| s.sale_id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_product_lines_skipped_and_renumbered() {
        let sales = vec![sale(
            "Norte",
            "luis@example.com",
            vec![line("Lápiz", 5.0, 1), line("Fantasma", 9.0, 1), line("Balón", 250.0, 2)],
        )];
        let (tables, stats) = RelationalMapper::map(&catalog(), &sales).unwrap();
        assert_eq!(stats.skipped_lines, 1);
        assert_eq!(tables.sale_lines.len(), 2);
        assert_eq!(tables.sale_lines[0].line_number, 1);
        assert_eq!(tables.sale_lines[1].line_number, 2);
        assert_eq!(tables.sale_lines[1].product_id, 2);
        assert_eq!(tables.sale_lines[1].line_total, 500.0);
    }

    #[test]
    fn test_unknown_store_or_employee_is_error() {
        let sales = vec![sale("Centro", "luis@example.com", vec![])];
        let err = RelationalMapper::map(&catalog(), &sales).unwrap_err();
        assert!(err.to_string().contains("unknown store 'Centro'"));

        let mut stray = sale("Norte", "luis@example.com", vec![]);
        stray.employee.first_name = "Pedro".into();
        let err = RelationalMapper::map(&catalog(), &[stray]).unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
    }

    #[test]
    fn test_sales_before_catalog_fail() {
        let mut mapper = RelationalMapper::new();
        let sales = vec![sale("Norte", "luis@example.com", vec![])];
        assert!(mapper.map_sales(&sales).is_err());
    }

    #[test]
    fn test_generated_dataset_renormalizes_with_integrity() {
        let source = generate(&GeneratorConfig {
            categories: 5,
            products: 30,
            stores: 3,
            employees: 9,
            customers: 40,
            sales: 150,
            max_lines: 5,
            ..Default::default()
        })
        .unwrap();
        let catalog = build_store_docs(&source).unwrap();
        let sales = build_sale_docs(&source).unwrap();

        let (tables, stats) = RelationalMapper::map(&catalog, &sales).unwrap();
        assert_eq!(tables.stores.len(), source.stores.len());
        assert_eq!(tables.employees.len(), source.employees.len());
        assert_eq!(tables.inventory.len(), source.inventory.len());
        assert_eq!(tables.sales.len(), source.sales.len());
        assert_eq!(tables.sale_lines.len() + stats.skipped_lines, source.sale_lines.len());

        // Every foreign key points at a row emitted earlier.
        let category_ids: HashSet<_> = tables.categories.iter().map(|c| c.category_id).collect();
        let product_ids: HashSet<_> = tables.products.iter().map(|p| p.product_id).collect();
        let store_ids: HashSet<_> = tables.stores.iter().map(|s| s.store_id).collect();
        let employee_ids: HashSet<_> = tables.employees.iter().map(|e| e.employee_id).collect();
        let customer_ids: HashSet<_> = tables.customers.iter().map(|c| c.customer_id).collect();
        let sale_ids: HashSet<_> = tables.sales.iter().map(|s| s.sale_id).collect();

        assert!(tables.products.iter().all(|p| category_ids.contains(&p.category_id)));
        assert!(tables.employees.iter().all(|e| store_ids.contains(&e.store_id)));
        assert!(tables
            .inventory
            .iter()
            .all(|i| store_ids.contains(&i.store_id) && product_ids.contains(&i.product_id)));
        assert!(tables.sales.iter().all(|s| {
            store_ids.contains(&s.store_id)
                && employee_ids.contains(&s.employee_id)
                && customer_ids.contains(&s.customer_id)
        }));
        assert!(tables
            .sale_lines
            .iter()
            .all(|l| sale_ids.contains(&l.sale_id) && product_ids.contains(&l.product_id)));

        // Timestamps and totals survive the trip.
        for (mapped, expected) in tables.sales.iter().zip(&source.sales) {
            assert_eq!(mapped.sale_timestamp, expected.sale_timestamp);
            assert_eq!(mapped.total_amount, expected.total_amount);
        }
    }

    #[test]
    fn test_duplicate_store_name_newest_wins() {
        let mut catalog = catalog();
        catalog[1].store_name = "Norte".into();

        let sales = vec![sale("Norte", "luis@example.com", vec![line("Lápiz", 5.0, 1)])];
        let (tables, stats) = RelationalMapper::map(&catalog, &sales).unwrap();
        assert_eq!(stats.stores, 2);
        assert_eq!(tables.stores.iter().map(|s| s.store_id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(tables.stores.iter().all(|s| s.name == "Norte"));
        assert_eq!(tables.sales[0].store_id, 2);
        assert_eq!(tables.sales[0].employee_id, 2);
    }

    #[test]
    fn test_product_first_sight_wins() {
        let mut catalog = catalog();
        catalog[1].inventory[0].product = product("Lápiz", "Oficina", 7.5);

        let sales = vec![sale("Sur", "luis@example.com", vec![line("Lápiz", 6.0, 2)])];
        let (tables, _) = RelationalMapper::map(&catalog, &sales).unwrap();
        assert_eq!(tables.products.len(), 2);
        assert_eq!(tables.products[0].price, 5.0);
        assert_eq!(tables.products[0].category_id, 1);
        assert_eq!(tables.inventory[2].product_id, 1);

        let sale_line = &tables.sale_lines[0];
        assert_eq!(sale_line.product_id, 1);
        assert_eq!(sale_line.unit_price, 6.0);
        assert_eq!(sale_line.line_total, 12.0);
    }

    #[test]
    fn test_default_dataset_maps_for_seed_12() {
        let source = generate(&GeneratorConfig { seed: 12, ..Default::default() }).unwrap();
        let catalog = build_store_docs(&source).unwrap();
        let sales = build_sale_docs(&source).unwrap();

        let (tables, _) = RelationalMapper::map(&catalog, &sales).unwrap();
        assert_eq!(tables.stores.len(), source.stores.len());
        assert_eq!(tables.sales.len(), source.sales.len());

        // Only customers who bought something come back, each exactly once.
        let buyers: HashSet<_> = source.sales.iter().map(|s| s.customer_id).collect();
        assert_eq!(tables.customers.len(), buyers.len());
    }

    #[test]
    fn test_stats_display() {
        let stats = MappingStats { stores: 2, sales: 3, skipped_lines: 1, repeat_customers: 0 };
        let text = stats.to_string();
        assert!(text.contains("Stores: 2"));
        assert!(text.contains("Skipped lines: 1"));
    }
}
