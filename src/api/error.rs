// ==========================================
// 毕业论文答辩评分系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换 Repository/引擎错误为用户可读的错误
// 约束: 校验与权限失败都发生在任何写入之前 (fail closed)
// ==========================================

use crate::engine::catalog::ScoreValidationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
///
/// 错误分四类,调用方据此区分展示:
/// - 校验错误: 本地拒绝,不重试
/// - 权限错误: 单独的"无权限"信号,UI 给权限提示而非一般故障
/// - 未找到: 针对按键更新;读取的缺席态用 Option 表达
/// - 基础设施错误: 原样上抛,核心内不自动重试
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误
    // ==========================================
    #[error("未知评分项: role={role}, key={key}")]
    UnknownCriterion { role: String, key: String },

    #[error("分值越界: key={key}, value={value}, 允许范围 [0, {max_points}]")]
    ScoreOutOfRange {
        key: String,
        value: f64,
        max_points: f64,
    },

    #[error("缺少必填字段: {0}")]
    MissingRequiredField(String),

    #[error("问题内容不能为空")]
    EmptyQuestionText,

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 权限错误
    // ==========================================
    #[error("无操作权限: {0}")]
    NoAccess(String),

    // ==========================================
    // 资源错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 校验错误由引擎产出,原样映射
impl From<ScoreValidationError> for ApiError {
    fn from(err: ScoreValidationError) -> Self {
        match err {
            ScoreValidationError::UnknownCriterion { role, key } => ApiError::UnknownCriterion {
                role: role.to_string(),
                key,
            },
            ScoreValidationError::ScoreOutOfRange {
                key,
                value,
                max_points,
            } => ApiError::ScoreOutOfRange {
                key,
                value,
                max_points,
            },
        }
    }
}

// 仓储错误统一转换
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段映射失败 (field={}): {}", field, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
