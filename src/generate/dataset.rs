//! Dataset builder: catalog, staff, customers, inventory and sales.

use super::rng::XorShift64;
use super::vocab::Faker;
use super::GeneratorConfig;
use crate::model::{
    round2, Category, Customer, Employee, InventoryItem, Position, Product, RetailTables, Sale,
    SaleLine, Store,
};
use crate::ui::StepProgress;
use crate::{Error, Result};
use chrono::{Duration, NaiveDateTime};
use std::collections::{HashMap, HashSet};

const MIN_PRICE: f64 = 5.0;
const MAX_PRICE: f64 = 1000.0;
const MAX_STOCK: i64 = 200;
const MAX_LINE_QUANTITY: i64 = 5;

/// Generate the full dataset for `config`. Deterministic per seed.
pub fn generate(config: &GeneratorConfig) -> Result<RetailTables> {
    config.validate()?;

    let mut rng = XorShift64::new(config.seed);
    let mut tables = RetailTables::default();

    tracing::info!("Generating catalog data (seed {})", config.seed);
    generate_catalog(config, &mut rng, &mut tables)?;

    tracing::info!("Generating {} sales", config.sales);
    generate_sales(config, &mut rng, &mut tables)?;

    tracing::debug!(
        sales = tables.sales.len(),
        sale_lines = tables.sale_lines.len(),
        "dataset generated"
    );
    Ok(tables)
}

fn id(index: usize) -> Result<i32> {
    i32::try_from(index + 1).map_err(|_| Error::Config(format!("id {} overflows INT", index + 1)))
}

fn generate_catalog(config: &GeneratorConfig, rng: &mut XorShift64, tables: &mut RetailTables) -> Result<()> {
    let mut fake = Faker::new(rng);

    let mut seen_words = HashSet::new();
    for i in 0..config.categories {
        let name = fake
            .unique(&mut seen_words, |f| f.word())
            .ok_or_else(|| Error::Config("ran out of unique category names".into()))?;
        tables.categories.push(Category { category_id: id(i)?, name });
    }

    let mut seen_phrases = HashSet::new();
    for i in 0..config.products {
        let name = fake
            .unique(&mut seen_phrases, |f| f.catch_phrase())
            .ok_or_else(|| Error::Config("ran out of unique product names".into()))?;
        let price = round2(fake.rng().uniform(MIN_PRICE, MAX_PRICE));
        let category_id = tables.categories[fake.rng().below(tables.categories.len())].category_id;
        tables.products.push(Product { product_id: id(i)?, name, price, category_id });
    }

    let mut seen_stores = HashSet::new();
    for i in 0..config.stores {
        let name = fake
            .unique(&mut seen_stores, |f| f.company())
            .ok_or_else(|| Error::Config("ran out of unique store names".into()))?;
        let address = fake.address().replace('\n', ", ");
        tables.stores.push(Store { store_id: id(i)?, name, address });
    }

    let stores = config.stores as i32;
    for i in 0..config.employees {
        let employee_id = id(i)?;
        let first_name = fake.first_name();
        let last_name = fake.last_name();
        let position = Position::all()[fake.rng().below(Position::all().len())];
        tables.employees.push(Employee {
            employee_id,
            first_name,
            last_name,
            position: position.as_str().to_string(),
            // round-robin
            store_id: (employee_id % stores) + 1,
        });
    }

    // Emails identify customers once sales are denormalized.
    let mut seen_emails = HashSet::new();
    for i in 0..config.customers {
        let first_name = fake.first_name();
        let last_name = fake.last_name();
        let email = fake
            .unique(&mut seen_emails, |f| f.email(&first_name, &last_name))
            .ok_or_else(|| Error::Config(format!("ran out of unique emails for {} {}", first_name, last_name)))?;
        tables.customers.push(Customer { customer_id: id(i)?, first_name, last_name, email });
    }

    // Each store stocks half of the catalog.
    let stocked = config.products / 2;
    let rng = fake.rng();
    for store in &tables.stores {
        for index in rng.sample_indices(tables.products.len(), stocked) {
            tables.inventory.push(InventoryItem {
                store_id: store.store_id,
                product_id: tables.products[index].product_id,
                quantity: rng.range_inclusive(0, MAX_STOCK) as i32,
            });
        }
    }

    Ok(())
}

fn random_timestamp(rng: &mut XorShift64, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    start + Duration::seconds(rng.range_inclusive(0, span))
}

fn generate_sales(config: &GeneratorConfig, rng: &mut XorShift64, tables: &mut RetailTables) -> Result<()> {
    let mut staff_by_store: HashMap<i32, Vec<i32>> = HashMap::new();
    for employee in &tables.employees {
        staff_by_store.entry(employee.store_id).or_default().push(employee.employee_id);
    }

    let progress = StepProgress::new(config.sales as u64, "Generating sales");

    for i in 0..config.sales {
        let sale_id = id(i)?;
        let sale_timestamp = random_timestamp(rng, config.start, config.end);

        let store_id = tables.stores[rng.below(tables.stores.len())].store_id;
        let staff = staff_by_store
            .get(&store_id)
            .ok_or_else(|| Error::Config(format!("store {} has no employees", store_id)))?;
        let employee_id = staff[rng.below(staff.len())];

        // A few customers account for most purchases.
        let customer_index = (rng.zipf(config.zipf_exponent) % config.customers as u64) as usize;
        let customer_id = tables.customers[customer_index].customer_id;

        let n_lines = rng.range_inclusive(config.min_lines as i64, config.max_lines as i64) as usize;
        let mut total_amount = 0.0;
        for (line_index, product_index) in rng
            .sample_indices(tables.products.len(), n_lines)
            .into_iter()
            .enumerate()
        {
            let product = &tables.products[product_index];
            let quantity = rng.range_inclusive(1, MAX_LINE_QUANTITY) as i32;
            let line_total = round2(product.price * f64::from(quantity));
            total_amount += line_total;
            tables.sale_lines.push(SaleLine {
                sale_id,
                line_number: id(line_index)?,
                product_id: product.product_id,
                quantity,
                unit_price: product.price,
                line_total,
            });
        }

        tables.sales.push(Sale {
            sale_id,
            sale_timestamp,
            customer_id,
            store_id,
            employee_id,
            total_amount: round2(total_amount),
        });
        progress.inc(1);
    }

    progress.finish();
    Ok(())
}
