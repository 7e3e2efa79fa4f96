pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{artefact, header, phase, section, status, success, timing, warn};
pub use progress::{Spinner, StepProgress};
pub use table::{row_count_table, timing_table};
pub use theme::{theme, Theme};
