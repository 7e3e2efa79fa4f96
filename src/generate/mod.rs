//! Synthetic dataset generation
//!
//! Produces the full relational dataset (catalog, customers, sales) from a
//! seed. Everything downstream, the SQL script, the JSON documents and the
//! loaders, derives from one `RetailTables` built here.

pub mod dataset;
pub mod rng;
pub mod vocab;

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use dataset::generate;
pub use rng::XorShift64;
pub use vocab::Faker;

/// Sizes and ranges for the synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub categories: usize,
    pub products: usize,
    pub stores: usize,
    /// Spread round-robin over stores
    pub employees: usize,
    pub customers: usize,
    pub sales: usize,
    pub min_lines: usize,
    pub max_lines: usize,
    pub seed: u64,
    /// Zipf exponent for customer popularity
    pub zipf_exponent: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            categories: 10,
            products: 100,
            stores: 5,
            employees: 25,
            customers: 1000,
            sales: 20_000,
            min_lines: 1,
            max_lines: 10,
            seed: 42,
            zipf_exponent: 2.0,
            start: midnight(2023, 5, 23),
            end: midnight(2025, 5, 22),
        }
    }
}

impl GeneratorConfig {
    /// Check that the configuration can produce a consistent dataset.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("categories", self.categories),
            ("products", self.products),
            ("stores", self.stores),
            ("employees", self.employees),
            ("customers", self.customers),
            ("sales", self.sales),
            ("min_lines", self.min_lines),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(Error::Config(format!("generator.{} must be > 0", name)));
        }
        if self.min_lines > self.max_lines {
            return Err(Error::Config(format!(
                "generator.min_lines ({}) exceeds generator.max_lines ({})",
                self.min_lines, self.max_lines
            )));
        }
        if self.max_lines > self.products {
            return Err(Error::Config(format!(
                "generator.max_lines ({}) exceeds generator.products ({}); sale lines use distinct products",
                self.max_lines, self.products
            )));
        }
        if self.products / 2 == 0 {
            return Err(Error::Config("generator.products must be >= 2 to stock stores".into()));
        }
        if self.employees < self.stores {
            return Err(Error::Config(format!(
                "generator.employees ({}) must be >= generator.stores ({}) so every store is staffed",
                self.employees, self.stores
            )));
        }
        if self.start >= self.end {
            return Err(Error::Config("generator.start must be before generator.end".into()));
        }
        if self.zipf_exponent <= 1.0 {
            return Err(Error::Config("generator.zipf_exponent must be > 1".into()));
        }
        if self.categories > vocab::word_capacity() {
            return Err(Error::Config(format!(
                "generator.categories ({}) exceeds the {} distinct category words available",
                self.categories,
                vocab::word_capacity()
            )));
        }
        if self.stores > vocab::company_capacity() {
            return Err(Error::Config(format!(
                "generator.stores ({}) exceeds the {} distinct store names available",
                self.stores,
                vocab::company_capacity()
            )));
        }
        if self.products > vocab::phrase_capacity() {
            return Err(Error::Config(format!(
                "generator.products ({}) exceeds the {} distinct product names available",
                self.products,
                vocab::phrase_capacity()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.start.to_string(), "2023-05-23 00:00:00");
    }

    #[test]
    fn test_rejects_zero_counts() {
        let config = GeneratorConfig { stores: 0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("generator.stores"));
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let lines = GeneratorConfig { min_lines: 5, max_lines: 2, ..Default::default() };
        assert!(lines.validate().is_err());

        let defaults = GeneratorConfig::default();
        let dates = GeneratorConfig {
            start: defaults.end,
            end: defaults.start,
            ..Default::default()
        };
        assert!(dates.validate().is_err());
    }

    #[test]
    fn test_rejects_unstaffed_stores() {
        let config = GeneratorConfig { stores: 5, employees: 4, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_more_lines_than_products() {
        let config = GeneratorConfig { products: 4, max_lines: 10, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_vocabulary_overflow() {
        let config = GeneratorConfig { categories: 10_000, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
