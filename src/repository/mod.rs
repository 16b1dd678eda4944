// ==========================================
// 毕业论文答辩评分系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod committee_repo;
pub mod error;
pub mod evaluation_repo;
pub mod qna_repo;
pub mod summary_repo;

// 重导出核心仓储
pub use committee_repo::CommitteeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use evaluation_repo::EvaluationRepository;
pub use qna_repo::QnaRepository;
pub use summary_repo::SummaryRepository;

/// 时间戳统一存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 日期统一存储格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";
