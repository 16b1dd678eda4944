// ==========================================
// 毕业论文答辩评分系统 - 领域类型定义
// ==========================================
// 约束: 角色与状态均为封闭枚举,禁止字符串散比较
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 评审角色 (Evaluator Role)
// ==========================================
// 指导教师 / 评阅教师 / 答辩委员会,固定三方
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluatorRole {
    Supervisor, // 指导教师
    Reviewer,   // 评阅教师
    Committee,  // 答辩委员会
}

impl EvaluatorRole {
    /// 全部角色（聚合时按此顺序遍历）
    pub const ALL: [EvaluatorRole; 3] = [
        EvaluatorRole::Supervisor,
        EvaluatorRole::Reviewer,
        EvaluatorRole::Committee,
    ];

    /// 数据库存储码
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorRole::Supervisor => "SUPERVISOR",
            EvaluatorRole::Reviewer => "REVIEWER",
            EvaluatorRole::Committee => "COMMITTEE",
        }
    }

    /// 从存储码解析
    pub fn parse(code: &str) -> Option<EvaluatorRole> {
        match code {
            "SUPERVISOR" => Some(EvaluatorRole::Supervisor),
            "REVIEWER" => Some(EvaluatorRole::Reviewer),
            "COMMITTEE" => Some(EvaluatorRole::Committee),
            _ => None,
        }
    }

    /// 排序键（列表输出的确定性顺序：指导教师 → 评阅教师 → 答辩委员会）
    pub fn sort_key(&self) -> i32 {
        match self {
            EvaluatorRole::Supervisor => 0,
            EvaluatorRole::Reviewer => 1,
            EvaluatorRole::Committee => 2,
        }
    }
}

impl fmt::Display for EvaluatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 评分状态 (Evaluation Status)
// ==========================================
// 约束: 状态只由 ScoreAggregator::derive_status 产出
// NoScore 为展示层对 Pending 的改写（任务列表在答辩日期已过且无记录时使用），
// 聚合引擎本身不产出 NoScore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    Pending,    // 等待其余角色评分
    Incomplete, // 存在未填满的评分记录
    Completed,  // 三方评分齐备,总分已定
    NoScore,    // 展示层: 不再预期评分
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationStatus::Pending => write!(f, "PENDING"),
            EvaluationStatus::Incomplete => write!(f, "INCOMPLETE"),
            EvaluationStatus::Completed => write!(f, "COMPLETED"),
            EvaluationStatus::NoScore => write!(f, "NO_SCORE"),
        }
    }
}

// ==========================================
// 委员会成员角色 (Committee Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitteeRole {
    Chairman,  // 主席
    Secretary, // 秘书
    Member,    // 委员
}

impl CommitteeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitteeRole::Chairman => "CHAIRMAN",
            CommitteeRole::Secretary => "SECRETARY",
            CommitteeRole::Member => "MEMBER",
        }
    }

    pub fn parse(code: &str) -> Option<CommitteeRole> {
        match code {
            "CHAIRMAN" => Some(CommitteeRole::Chairman),
            "SECRETARY" => Some(CommitteeRole::Secretary),
            "MEMBER" => Some(CommitteeRole::Member),
            _ => None,
        }
    }

    /// 列表输出顺序：主席 → 秘书 → 委员
    pub fn sort_key(&self) -> i32 {
        match self {
            CommitteeRole::Chairman => 0,
            CommitteeRole::Secretary => 1,
            CommitteeRole::Member => 2,
        }
    }
}

impl fmt::Display for CommitteeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 任务列表筛选范围 (Task Scope)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskScope {
    All,       // 全部任务
    Pending,   // 尚未完成评分
    Completed, // 已完成评分
}
