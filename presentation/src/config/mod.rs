//! Presentation-level configuration
//!
//! Resolves how results are shown from the `[output]` file settings and
//! the command-line flags.

use crate::cli::commands::Cli;
use mend_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Start from file settings (`[output]` section).
    pub fn from_file(format: Option<OutputFormat>, color: bool) -> Self {
        Self {
            format: format.unwrap_or_default(),
            color,
            ..Self::default()
        }
    }

    /// Apply command-line flags on top.
    ///
    /// JSON output never shows progress or colors.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(format) = cli.output {
            self.format = format.into();
        }
        if cli.quiet {
            self.show_progress = false;
        }
        if self.format == OutputFormat::Json {
            self.show_progress = false;
            self.color = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_file_settings_apply_without_flags() {
        let cli = Cli::try_parse_from(["mend", "invoke", "t"]).unwrap();
        let config = OutputConfig::from_file(None, false).with_cli(&cli);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.color);
        assert!(config.show_progress);
    }

    #[test]
    fn test_cli_format_overrides_file() {
        let cli = Cli::try_parse_from(["mend", "-o", "json", "invoke", "t"]).unwrap();
        let config = OutputConfig::from_file(Some(OutputFormat::Text), true).with_cli(&cli);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.color);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let cli = Cli::try_parse_from(["mend", "-q", "invoke", "t"]).unwrap();
        let config = OutputConfig::default().with_cli(&cli);
        assert!(!config.show_progress);
        assert!(config.color);
    }
}
