use crate::utils::error::Result;
use clap::{Subcommand, ValueEnum};
use std::fs;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Score one neighborhood from a JSON indicator set
    Calculate {
        /// JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Print the example indicator set
    Example,
    /// List indicator definitions with their weights
    Indicators,
    /// Print category and indicator weights
    Weights,
    /// Score and write a data analysis report
    Report {
        #[arg(default_value = "-")]
        input: String,
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Environmental trend across yearly observations
    Trend {
        #[arg(default_value = "-")]
        input: String,
    },
    /// Score every row of a CSV file
    Batch {
        input: String,
        /// Output CSV path (stdout when omitted)
        #[arg(long)]
        output: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Calculate { .. } => "calculate",
            Command::Example => "example",
            Command::Indicators => "indicators",
            Command::Weights => "weights",
            Command::Report { .. } => "report",
            Command::Trend { .. } => "trend",
            Command::Batch { .. } => "batch",
        }
    }

    /// Whether the command can be served by a remote scoring service.
    pub fn supports_remote(&self) -> bool {
        !matches!(self, Command::Trend { .. } | Command::Batch { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Input and output files relative to the working directory; `-` means stdin.
#[derive(Debug, Clone, Default)]
pub struct LocalFiles;

impl LocalFiles {
    pub fn read_to_string(&self, path: &str) -> Result<String> {
        if path == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            return Ok(buffer);
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn read_json(&self, path: &str) -> Result<serde_json::Value> {
        let content = self.read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/2024/report.md");
        let path = path.to_str().unwrap();

        LocalFiles.write_file(path, b"# Report").unwrap();
        assert_eq!(LocalFiles.read_to_string(path).unwrap(), "# Report");
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.json");
        fs::write(&path, "not json").unwrap();

        assert!(LocalFiles.read_json(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_remote_support() {
        assert!(Command::Example.supports_remote());
        assert!(!Command::Trend {
            input: "-".to_string()
        }
        .supports_remote());
    }
}
