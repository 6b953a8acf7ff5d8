use serde::Deserialize;
use ts_rs::TS;

/// 下载格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/export.ts")]
pub enum ExportFormat {
    Json,
    Markdown,
    Csv,
    Mermaid,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Csv => "csv",
            ExportFormat::Mermaid => "mmd",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Mermaid => "text/plain; charset=utf-8",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Csv => "csv",
            ExportFormat::Mermaid => "mermaid",
        };
        write!(f, "{name}")
    }
}

/// `?format=` 查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/export.ts")]
pub struct ExportQuery {
    pub format: Option<ExportFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        let q: ExportQuery = serde_json::from_str(r#"{"format":"markdown"}"#).unwrap();
        assert_eq!(q.format, Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert!(serde_json::from_str::<ExportQuery>(r#"{"format":"pdf"}"#).is_err());
    }
}
