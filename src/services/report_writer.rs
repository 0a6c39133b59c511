//! Report file serialization.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::errors::ReportWriteError;
use crate::domain::models::{InvestigationResult, ReportSettings};

const SEPARATOR_WIDTH: usize = 50;

pub struct ReportWriter {
    output_dir: PathBuf,
    settings: ReportSettings,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, settings: ReportSettings) -> Self {
        Self {
            output_dir: output_dir.into(),
            settings,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `{output_dir}/{prefix}_{YYYYMMDD_HHMMSS}.txt`, creating the directory.
    ///
    /// Two writes within the same second target the same path; the later one wins.
    pub async fn write_report(
        &self,
        target: &str,
        result: &InvestigationResult,
    ) -> Result<PathBuf, ReportWriteError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ReportWriteError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .output_dir
            .join(format!("{}_{stamp}.txt", self.settings.file_prefix));

        let content = render_report(&self.settings.header, target, &result.body());
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ReportWriteError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), "report written");
        Ok(path)
    }
}

/// Header, separator, blank line, target line, separator, blank line, body.
pub fn render_report(header: &str, target: &str, body: &str) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    format!("{header}\n{separator}\n\nTarget: {target}\n{separator}\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report_layout() {
        let text = render_report("Darknet Investigation Report", "alice", "body\n");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Darknet Investigation Report");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Target: alice");
        assert_eq!(lines[4], "=".repeat(50));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "body");
    }
}
