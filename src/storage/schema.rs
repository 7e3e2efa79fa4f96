//! PostgreSQL schema definitions

/// Tables in foreign-key dependency order (parents first)
pub const TABLE_ORDER: &[&str] = &[
    "category",
    "product",
    "store",
    "employee",
    "customer",
    "inventory",
    "sale",
    "saleline",
];

pub const CREATE_CATEGORY_TABLE: &str = r#"
CREATE TABLE category (
    category_id INT PRIMARY KEY,
    name VARCHAR(100)
)"#;

pub const CREATE_PRODUCT_TABLE: &str = r#"
CREATE TABLE product (
    product_id INT PRIMARY KEY,
    name VARCHAR(100),
    price DECIMAL(10,2),
    category_id INT REFERENCES category(category_id)
)"#;

pub const CREATE_STORE_TABLE: &str = r#"
CREATE TABLE store (
    store_id INT PRIMARY KEY,
    name VARCHAR(100),
    address VARCHAR(200)
)"#;

pub const CREATE_EMPLOYEE_TABLE: &str = r#"
CREATE TABLE employee (
    employee_id INT PRIMARY KEY,
    first_name VARCHAR(50),
    last_name VARCHAR(50),
    position VARCHAR(50),
    store_id INT REFERENCES store(store_id)
)"#;

pub const CREATE_CUSTOMER_TABLE: &str = r#"
CREATE TABLE customer (
    customer_id INT PRIMARY KEY,
    first_name VARCHAR(50),
    last_name VARCHAR(50),
    email VARCHAR(100)
)"#;

pub const CREATE_INVENTORY_TABLE: &str = r#"
CREATE TABLE inventory (
    store_id INT REFERENCES store(store_id),
    product_id INT REFERENCES product(product_id),
    quantity INT,
    PRIMARY KEY (store_id, product_id)
)"#;

pub const CREATE_SALE_TABLE: &str = r#"
CREATE TABLE sale (
    sale_id INT PRIMARY KEY,
    sale_timestamp TIMESTAMP,
    customer_id INT REFERENCES customer(customer_id),
    store_id INT REFERENCES store(store_id),
    employee_id INT REFERENCES employee(employee_id),
    total_amount DECIMAL(12,2)
)"#;

pub const CREATE_SALELINE_TABLE: &str = r#"
CREATE TABLE saleline (
    sale_id INT REFERENCES sale(sale_id),
    line_number INT,
    product_id INT REFERENCES product(product_id),
    quantity INT,
    unit_price DECIMAL(10,2),
    line_total DECIMAL(12,2),
    PRIMARY KEY (sale_id, line_number)
)"#;

/// Simple performance indices
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX idx_sale_timestamp ON sale(sale_timestamp)",
    "CREATE INDEX idx_product_category ON product(category_id)",
];

/// Drop statements, children first, so a rerun starts clean
pub fn drop_statements() -> Vec<String> {
    TABLE_ORDER
        .iter()
        .rev()
        .map(|table| format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .collect()
}

/// All schema creation statements, preceded by the drops
pub fn all_schema_statements() -> Vec<String> {
    let mut stmts = drop_statements();
    stmts.extend(
        [
            CREATE_CATEGORY_TABLE,
            CREATE_PRODUCT_TABLE,
            CREATE_STORE_TABLE,
            CREATE_EMPLOYEE_TABLE,
            CREATE_CUSTOMER_TABLE,
            CREATE_INVENTORY_TABLE,
            CREATE_SALE_TABLE,
            CREATE_SALELINE_TABLE,
        ]
        .iter()
        .map(|s| s.trim().to_string()),
    );
    stmts.extend(CREATE_INDEXES.iter().map(|s| s.to_string()));
    stmts
}

/// The schema as one executable script
pub fn schema_script() -> String {
    let mut script = String::new();
    for stmt in all_schema_statements() {
        script.push_str(&stmt);
        script.push_str(";\n");
    }
    script
}
