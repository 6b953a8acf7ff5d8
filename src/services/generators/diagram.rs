use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GeneratorService, parser::extract_mermaid, prompts::diagram_prompt};
use crate::models::{
    ApiResponse, ErrorCode,
    common::ExportFormat,
    generators::{
        entities::Diagram,
        requests::{ExportDiagramRequest, GenerateDiagramRequest},
        responses::DiagramResponse,
    },
};
use crate::services::access::{attachment, current_user, external_error, safe_filename};
use crate::utils::validate::validate_required_text;

pub fn render_markdown(diagram: &Diagram) -> String {
    format!(
        "# {} diagram\n\n{}\n\n```mermaid\n{}\n```\n",
        diagram.diagram_type, diagram.description, diagram.code
    )
}

pub async fn generate_diagram(
    service: &GeneratorService,
    body: GenerateDiagramRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let description = match validate_required_text("Description", &body.description, 1, 2000) {
        Ok(description) => description,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GeneratorRequestInvalid, msg)));
        }
    };

    let user = try_response!(current_user(request));
    let generator = try_response!(service.get_generator(request));

    let output = match generator
        .generate(&diagram_prompt(&description, body.diagram_type))
        .await
    {
        Ok(output) => output,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };
    let code = match extract_mermaid(&output, body.diagram_type) {
        Ok(code) => code,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };

    info!("User {} generated a {} diagram", user.id, body.diagram_type);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DiagramResponse {
            diagram: Diagram {
                diagram_type: body.diagram_type,
                description,
                code,
            },
        },
        "Diagram generated successfully",
    )))
}

pub async fn export_diagram(body: ExportDiagramRequest) -> ActixResult<HttpResponse> {
    let format = body.format.unwrap_or(ExportFormat::Mermaid);
    let diagram = body.diagram;
    let stem = safe_filename(&format!("{}-diagram", diagram.diagram_type));

    let content = match format {
        ExportFormat::Mermaid => format!("{}\n", diagram.code.trim_end()),
        ExportFormat::Markdown => render_markdown(&diagram),
        other => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExportFormatUnsupported,
                format!("Unsupported export format for diagrams: {other}"),
            )));
        }
    };

    Ok(attachment(
        format.content_type(),
        &format!("{stem}.{}", format.extension()),
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generators::entities::DiagramType;

    #[test]
    fn test_render_markdown() {
        let diagram = Diagram {
            diagram_type: DiagramType::Flowchart,
            description: "Login flow".into(),
            code: "flowchart TD\n  A-->B".into(),
        };
        assert_eq!(
            render_markdown(&diagram),
            "# flowchart diagram\n\nLogin flow\n\n```mermaid\nflowchart TD\n  A-->B\n```\n"
        );
    }
}
