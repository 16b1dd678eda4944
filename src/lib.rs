// ==========================================
// 毕业论文答辩评分系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 答辩评审决策支持核心 (UI 层为外部消费方)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA/schema 统一）
pub mod db;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CommitteeRole, EvaluationStatus, EvaluatorRole, TaskScope};

// 领域实体
pub use domain::{
    CommitteeMember, Evaluation, FinalScore, QnaEntry, SummaryContent, SummaryDocument,
    TopicAssignment,
};

// 引擎
pub use engine::{AccessGuard, Criterion, GuardAction, RoleCriteriaCatalog, ScoreAggregator};

// API
pub use api::{EvaluationApi, QnaApi, SummaryApi};

/// 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
