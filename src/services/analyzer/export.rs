use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt::Write;

use super::AnalyzerService;
use crate::models::{
    ApiResponse, ErrorCode, analyzer::entities::RepositoryReport,
    analyzer::requests::ExportRepositoryRequest, common::ExportFormat,
};
use crate::services::access::{attachment, safe_filename};

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn render_markdown(report: &RepositoryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", report.full_name);
    if let Some(description) = report.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "{description}\n");
    }
    let _ = writeln!(out, "- URL: {}", report.html_url);
    let _ = writeln!(out, "- Default branch: {}", or_dash(report.default_branch.as_deref()));
    let _ = writeln!(
        out,
        "- Stars: {} · Forks: {} · Open issues: {}",
        report.stars, report.forks, report.open_issues
    );
    let _ = writeln!(
        out,
        "- Analyzed at: {}\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !report.languages.is_empty() {
        let _ = writeln!(out, "## Languages\n");
        let _ = writeln!(out, "| Language | Bytes | Share |");
        let _ = writeln!(out, "|---|---:|---:|");
        for language in &report.languages {
            let _ = writeln!(
                out,
                "| {} | {} | {:.2}% |",
                language.name, language.bytes, language.percentage
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Contributors\n");
    if !report.stats_available {
        let _ = writeln!(
            out,
            "_Line statistics are still being computed; scores use commit counts only._\n"
        );
    }
    let _ = writeln!(
        out,
        "| # | Login | Commits | Additions | Deletions | Active weeks | Commit share | Score | Level |"
    );
    let _ = writeln!(out, "|---:|---|---:|---:|---:|---:|---:|---:|---|");
    for (index, c) in report.contributors.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.2}% | {:.2} | {} |",
            index + 1,
            c.login,
            c.commits,
            c.additions,
            c.deletions,
            c.active_weeks,
            c.commit_share,
            c.score,
            c.level
        );
    }

    let totals = &report.totals;
    let _ = writeln!(
        out,
        "\nTotals: {} contributor(s), {} commit(s), +{} / -{} line(s) over {} week(s).",
        totals.contributors, totals.commits, totals.additions, totals.deletions, totals.weeks_observed
    );
    out
}

pub async fn export_repository(
    service: &AnalyzerService,
    body: ExportRepositoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let format = body.format.unwrap_or(ExportFormat::Markdown);
    if !matches!(format, ExportFormat::Json | ExportFormat::Markdown) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ExportFormatUnsupported,
            format!("Unsupported export format for repository reports: {format}"),
        )));
    }

    let (report, _) = try_response!(service.resolve_report(&body.repository, false, request).await);
    let filename = format!("{}.{}", safe_filename(&report.full_name), format.extension());

    let content = if format == ExportFormat::Json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExportFailed,
                    format!("Repository report export failed: {e}"),
                )));
            }
        }
    } else {
        render_markdown(&report)
    };

    Ok(attachment(format.content_type(), &filename, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analyzer::report::{build_report, tests::snapshot};

    #[test]
    fn test_render_markdown() {
        let md = render_markdown(&build_report(snapshot(true), chrono::Utc::now()));
        assert!(md.starts_with("# acme/widget\n\nWidgets\n"));
        assert!(md.contains("| Rust | 750 | 75.00% |"));
        assert!(md.contains("| 1 | alice | 8 | 160 | 40 | 2 | 80.00% | 78.33 | core |"));
        assert!(!md.contains("still being computed"));
    }

    #[test]
    fn test_render_markdown_without_stats() {
        let md = render_markdown(&build_report(snapshot(false), chrono::Utc::now()));
        assert!(md.contains("still being computed"));
    }
}
