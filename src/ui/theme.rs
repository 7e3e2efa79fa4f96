use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles for the benchmark output
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Name of the ingestion step being timed
    pub step: Style,
}

impl Theme {
    /// Colored on a terminal unless `NO_COLOR` is set
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            step: Style::new().blue().bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            step: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_has_no_styles() {
        let plain = Theme::plain();
        let colored = Theme::colored();
        let pairs = [
            (&plain.header, &colored.header),
            (&plain.success, &colored.success),
            (&plain.warn, &colored.warn),
            (&plain.info, &colored.info),
            (&plain.dim, &colored.dim),
            (&plain.step, &colored.step),
        ];
        for (p, c) in pairs {
            assert_eq!(format!("{:?}", p), format!("{:?}", Style::new()));
            assert_ne!(format!("{:?}", c), format!("{:?}", Style::new()));
        }
    }
}
