//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_evaladmin_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EvalAdminError {
            $($variant(String),)*
        }

        impl EvalAdminError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EvalAdminError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EvalAdminError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EvalAdminError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EvalAdminError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EvalAdminError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_evaladmin_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    ExternalService("E013", "External Service Error"),
    ExternalServiceConfig("E014", "External Service Configuration Error"),
    ResponseParse("E015", "Response Parse Error"),
    Export("E016", "Export Error"),
}

impl EvalAdminError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突（SQLite / PostgreSQL / MySQL）
    pub fn is_unique_violation(&self) -> bool {
        let msg = self.message();
        msg.contains("UNIQUE constraint failed")
            || msg.contains("duplicate key value")
            || msg.contains("Duplicate entry")
    }

    /// 是否为外键约束冲突
    pub fn is_foreign_key_violation(&self) -> bool {
        let msg = self.message();
        msg.contains("FOREIGN KEY constraint failed")
            || msg.contains("violates foreign key constraint")
            || msg.contains("a foreign key constraint fails")
    }
}

impl fmt::Display for EvalAdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EvalAdminError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EvalAdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        EvalAdminError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EvalAdminError {
    fn from(err: std::io::Error) -> Self {
        EvalAdminError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EvalAdminError {
    fn from(err: serde_json::Error) -> Self {
        EvalAdminError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EvalAdminError {
    fn from(err: chrono::ParseError) -> Self {
        EvalAdminError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for EvalAdminError {
    fn from(err: reqwest::Error) -> Self {
        EvalAdminError::ExternalService(err.to_string())
    }
}

impl From<csv::Error> for EvalAdminError {
    fn from(err: csv::Error) -> Self {
        EvalAdminError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalAdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EvalAdminError::cache_connection("test").code(), "E001");
        assert_eq!(EvalAdminError::database_config("test").code(), "E003");
        assert_eq!(EvalAdminError::validation("test").code(), "E007");
        assert_eq!(EvalAdminError::external_service("test").code(), "E013");
        assert_eq!(EvalAdminError::response_parse("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EvalAdminError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EvalAdminError::external_service_config("missing key").error_type(),
            "External Service Configuration Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = EvalAdminError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_constraint_detection() {
        let sqlite = EvalAdminError::database_operation(
            "创建用户失败: UNIQUE constraint failed: users.email",
        );
        assert!(sqlite.is_unique_violation());
        assert!(!sqlite.is_foreign_key_violation());

        let pg = EvalAdminError::database_operation(
            "duplicate key value violates unique constraint \"areas_name_key\"",
        );
        assert!(pg.is_unique_violation());

        let fk = EvalAdminError::database_operation("FOREIGN KEY constraint failed");
        assert!(fk.is_foreign_key_violation());
    }
}
