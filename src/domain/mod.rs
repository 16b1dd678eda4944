// ==========================================
// 毕业论文答辩评分系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod committee;
pub mod evaluation;
pub mod qna;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use committee::{CommitteeMember, TopicAssignment};
pub use evaluation::{format_points, Evaluation, FinalScore};
pub use qna::QnaEntry;
pub use summary::{
    CommitteeSummaryContent, ReviewerSummaryContent, SummaryContent, SummaryDocument,
    SummaryEnvelope, SupervisorSummaryContent, SUMMARY_SCHEMA_VERSION,
};
pub use types::{CommitteeRole, EvaluationStatus, EvaluatorRole, TaskScope};
