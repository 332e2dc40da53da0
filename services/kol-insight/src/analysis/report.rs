//! Report generation for insight analyses.
//!
//! Generates reports in two formats:
//! - Markdown (for operators)
//! - JSON (for API/programmatic use)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::engine::InsightAnalysis;

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Markdown format (human-readable)
    Markdown,
    /// JSON format (machine-readable)
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

// ============================================================================
// Insight Report
// ============================================================================

/// Report generator for an insight analysis.
pub struct InsightReport<'a> {
    analysis: &'a InsightAnalysis,
}

impl<'a> InsightReport<'a> {
    pub fn new(analysis: &'a InsightAnalysis) -> Self {
        Self { analysis }
    }

    /// Generate report in the specified format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Save report to file. Adds the format's extension when `path` has none.
    pub fn save_to_file(&self, path: &Path, format: ReportFormat) -> Result<PathBuf> {
        let content = self.generate(format);
        let extension = match format {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        };

        let file_path = if path.extension().is_none() {
            path.with_extension(extension)
        } else {
            path.to_path_buf()
        };

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create report directory")?;
        }

        std::fs::write(&file_path, content).context("Failed to write report file")?;

        Ok(file_path)
    }

    /// Generate markdown report.
    pub fn to_markdown(&self) -> String {
        let a = self.analysis;
        let mut md = String::new();

        md.push_str(&format!(
            "# 互動特徵分析報告\n\n**時間**: {}\n**樣本數**: {} 篇\n**高互動組**: 前 {} 篇\n\n",
            a.generated_at.format("%Y-%m-%d %H:%M:%S"),
            a.population_size,
            a.decile_size
        ));

        md.push_str("## 重點發現\n\n");
        for insight in &a.insights {
            md.push_str(&format!("- {}\n", insight));
        }
        md.push('\n');

        md.push_str("## 特徵排名\n\n");
        md.push_str("| 排名 | 特徵 | 高互動組 | 整體 | 差異 | 影響 |\n");
        md.push_str("|------|------|----------|------|------|------|\n");
        for (i, entry) in a.ranking.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.0}% | {:.0}% | {:+.0} | {} |\n",
                i + 1,
                entry.feature_name,
                entry.top_decile_value,
                entry.population_value,
                entry.lift,
                entry.impact
            ));
        }
        md.push('\n');

        if !a.experiments.is_empty() {
            md.push_str("## 建議實驗\n\n");
            for exp in &a.experiments {
                md.push_str(&format!(
                    "### {}\n\n{}\n\n- **預期表現**: {:.1}\n- **信心水準**: {:.0}%\n",
                    exp.name,
                    exp.description,
                    exp.expected_performance,
                    exp.confidence_level * 100.0
                ));
                for (key, value) in &exp.parameters {
                    md.push_str(&format!("- `{}`: {}\n", key, value));
                }
                md.push('\n');
            }
        }

        md.push_str("---\n*本報告由互動特徵分析引擎自動生成*\n");
        md
    }

    /// Generate JSON report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self.analysis).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize insight analysis");
            "{}".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::InsightEngine;
    use crate::testing::PostBuilder;

    fn analysis() -> InsightAnalysis {
        let mut posts = vec![PostBuilder::new("top").body("會噴嗎？").likes(50).build()];
        for i in 0..9 {
            posts.push(PostBuilder::new(&format!("p{}", i)).likes(i).build());
        }
        InsightEngine::with_defaults().analyze(&posts).unwrap()
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_markdown_contains_sections() {
        let analysis = analysis();
        let md = InsightReport::new(&analysis).to_markdown();
        assert!(md.contains("# 互動特徵分析報告"));
        assert!(md.contains("## 特徵排名"));
        assert!(md.contains("包含問句比例"));
        assert!(md.contains("## 建議實驗"));
        assert!(md.contains("+90"));
    }

    #[test]
    fn test_json_report_parses_back() {
        let analysis = analysis();
        let json = InsightReport::new(&analysis).to_json();
        let parsed: InsightAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population_size, 10);
        assert_eq!(parsed.ranking.len(), analysis.ranking.len());
    }

    #[test]
    fn test_save_to_file_adds_extension() {
        let analysis = analysis();
        let dir = tempfile::tempdir().unwrap();
        let path = InsightReport::new(&analysis)
            .save_to_file(&dir.path().join("reports").join("weekly"), ReportFormat::Markdown)
            .unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("md"));
        assert!(std::fs::read_to_string(path).unwrap().contains("互動特徵分析報告"));
    }
}
