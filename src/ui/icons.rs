pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const FILE: &str = "📄";
    pub const GEAR: &str = "⚙️";
    pub const CLOCK: &str = "⏱️";
    pub const CART: &str = "🛒";
    /// PostgreSQL steps
    pub const DATABASE: &str = "🗄️";
    /// MongoDB steps
    pub const LEAF: &str = "🍃";
}
