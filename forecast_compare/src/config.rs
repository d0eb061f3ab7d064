//! Output locations and chart settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the service writes its artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding the charts and the export
    pub output_dir: PathBuf,
    /// File name of the forecast export
    pub export_file: String,
    /// File name of the comparison chart
    pub comparison_chart_file: String,
    /// File name of the selected-model chart
    pub selected_chart_file: String,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static"),
            export_file: "forecast.csv".to_string(),
            comparison_chart_file: "comparison.png".to_string(),
            selected_chart_file: "selected_model.png".to_string(),
            chart_width: 800,
            chart_height: 400,
        }
    }
}

impl ServiceConfig {
    /// Default file names inside the given directory
    pub fn with_output_dir<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(&self.export_file)
    }

    pub fn comparison_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.comparison_chart_file)
    }

    pub fn selected_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.selected_chart_file)
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }

    /// Create the output directory if it does not exist
    pub fn ensure_output_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
    }
}
