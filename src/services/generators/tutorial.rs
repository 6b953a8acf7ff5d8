use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt::Write;
use tracing::info;

use super::{GeneratorService, parser::parse_tutorial, prompts::tutorial_prompt};
use crate::models::{
    ApiResponse, ErrorCode,
    common::ExportFormat,
    generators::{
        entities::Tutorial,
        requests::{ExportTutorialRequest, GenerateTutorialRequest},
        responses::TutorialResponse,
    },
};
use crate::services::access::{attachment, current_user, external_error, safe_filename};
use crate::utils::validate::{normalize_optional_text, validate_required_text};

pub const MIN_SECTIONS: u32 = 3;
pub const MAX_SECTIONS: u32 = 10;
const DEFAULT_SECTIONS: u32 = 5;

pub fn render_markdown(tutorial: &Tutorial) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", tutorial.title);
    if !tutorial.summary.is_empty() {
        let _ = writeln!(out, "> {}\n", tutorial.summary);
    }
    let _ = writeln!(
        out,
        "_Topic: {} · Level: {} · Language: {}_\n",
        tutorial.topic, tutorial.level, tutorial.language
    );
    for section in &tutorial.sections {
        let _ = writeln!(out, "## {}\n\n{}\n", section.heading, section.content);
    }
    out
}

pub async fn generate_tutorial(
    service: &GeneratorService,
    body: GenerateTutorialRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let topic = match validate_required_text("Topic", &body.topic, 1, 300) {
        Ok(topic) => topic,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GeneratorRequestInvalid, msg)));
        }
    };
    let sections = body.sections.unwrap_or(DEFAULT_SECTIONS);
    if !(MIN_SECTIONS..=MAX_SECTIONS).contains(&sections) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GeneratorRequestInvalid,
            format!("Section count must be between {MIN_SECTIONS} and {MAX_SECTIONS}"),
        )));
    }
    let level = normalize_optional_text(body.level).unwrap_or_else(|| "beginner".to_string());
    let language = normalize_optional_text(body.language).unwrap_or_else(|| "English".to_string());

    let user = try_response!(current_user(request));
    let generator = try_response!(service.get_generator(request));

    let output = match generator
        .generate(&tutorial_prompt(&topic, &level, &language, sections))
        .await
    {
        Ok(output) => output,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };
    let (title, summary, sections) = match parse_tutorial(&output) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };

    info!("User {} generated a tutorial about {:?}", user.id, topic);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TutorialResponse {
            tutorial: Tutorial {
                title,
                summary,
                topic,
                level,
                language,
                sections,
            },
        },
        "Tutorial generated successfully",
    )))
}

pub async fn export_tutorial(body: ExportTutorialRequest) -> ActixResult<HttpResponse> {
    let format = body.format.unwrap_or(ExportFormat::Markdown);
    let filename = format!(
        "{}.{}",
        safe_filename(&body.tutorial.title),
        format.extension()
    );

    let content = match format {
        ExportFormat::Markdown => render_markdown(&body.tutorial),
        ExportFormat::Json => match serde_json::to_string_pretty(&body.tutorial) {
            Ok(json) => json,
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExportFailed,
                    format!("Tutorial export failed: {e}"),
                )));
            }
        },
        other => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExportFormatUnsupported,
                format!("Unsupported export format for tutorials: {other}"),
            )));
        }
    };

    Ok(attachment(format.content_type(), &filename, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generators::entities::TutorialSection;

    #[test]
    fn test_render_markdown() {
        let tutorial = Tutorial {
            title: "Async Rust".into(),
            summary: "Futures and executors.".into(),
            topic: "async".into(),
            level: "beginner".into(),
            language: "English".into(),
            sections: vec![TutorialSection {
                heading: "Futures".into(),
                content: "A future is lazy.".into(),
            }],
        };
        let md = render_markdown(&tutorial);
        assert!(md.starts_with("# Async Rust\n\n> Futures and executors.\n"));
        assert!(md.contains("## Futures\n\nA future is lazy.\n"));
    }
}
