pub mod analyzer;

pub mod areas;

pub mod attempts;

pub mod auth;

pub mod evaluations;

pub mod exam;

pub mod generators;

pub mod live;

pub mod questions;

pub mod reports;

pub mod users;

pub use analyzer::configure_analyzer_routes;
pub use areas::configure_area_routes;
pub use attempts::configure_attempt_routes;
pub use auth::configure_auth_routes;
pub use evaluations::configure_evaluation_routes;
pub use exam::configure_exam_routes;
pub use generators::configure_generator_routes;
pub use live::configure_live_routes;
pub use questions::configure_question_routes;
pub use reports::configure_report_routes;
pub use users::configure_user_routes;
