// ==========================================
// 毕业论文答辩评分系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供外部 UI/CLI 层调用
// 约束: 顺序固定为 权限 → 校验 → 落库,失败即中止,无半写
// ==========================================

pub mod error;
pub mod evaluation_api;
pub mod qna_api;
pub mod summary_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use evaluation_api::{EvaluationApi, EvaluatorTask, SubmitEvaluationRequest};
pub use qna_api::{AddQuestionRequest, QnaApi, SecretaryAccess, UpdateAnswerRequest};
pub use summary_api::SummaryApi;
