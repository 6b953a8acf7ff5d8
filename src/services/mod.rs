/// 展开 `Result<T, HttpResponse>`，错误时直接返回该响应
macro_rules! try_response {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

pub(crate) mod access;
#[cfg(test)]
pub(crate) mod test_support;

pub mod analyzer;
pub mod areas;
pub mod attempts;
pub mod auth;
pub mod evaluations;
pub mod exams;
pub mod generators;
pub mod live;
pub mod questions;
pub mod reports;
pub mod users;

pub use analyzer::AnalyzerService;
pub use areas::AreaService;
pub use attempts::AttemptService;
pub use auth::AuthService;
pub use evaluations::EvaluationService;
pub use exams::ExamService;
pub use generators::GeneratorService;
pub use live::LiveService;
pub use questions::QuestionService;
pub use reports::ReportService;
pub use users::UserService;
