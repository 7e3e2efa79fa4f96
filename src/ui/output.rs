use crate::ui::{theme, Icons};
use indicatif::HumanDuration;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

/// Announce a benchmark step before it runs
pub fn phase(icon: &str, name: &str) {
    println!();
    println!("{} {} …", icon.style(theme().info.clone()), name.style(theme().step.clone()));
}

/// Report how long a step took, e.g. `   ⏱️ PostgreSQL load - JSON: 3.41 s (3 seconds)`
pub fn timing(label: &str, elapsed: Duration) {
    println!(
        "   {} {}: {:.2} s {}",
        Icons::CLOCK.style(theme().dim.clone()),
        label,
        elapsed.as_secs_f64(),
        format!("({})", HumanDuration(elapsed)).style(theme().dim.clone())
    );
}

/// A file written by the generator or the benchmark
pub fn artefact(path: &Path) {
    println!("  {} {}", Icons::FILE.style(theme().info.clone()), path.display());
}
