// ==========================================
// 毕业论文答辩评分系统 - 引擎层
// ==========================================
// 职责: 业务规则 (评分细则、聚合、权限)
// 红线: 引擎无状态,不直接持有数据库连接;
//       数据由 API 层取好后喂给引擎
// ==========================================

pub mod access;
pub mod aggregator;
pub mod catalog;

// 重导出核心引擎
pub use access::{AccessGuard, GuardAction};
pub use aggregator::{
    ScoreAggregator, COMMITTEE_WEIGHT, REVIEWER_WEIGHT, SUPERVISOR_WEIGHT, WEIGHT_TOTAL,
};
pub use catalog::{Criterion, RoleCriteriaCatalog, ScoreValidationError};
