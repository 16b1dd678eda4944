// ==========================================
// 毕业论文答辩评分系统 - 评分领域模型
// ==========================================
// 红线: Evaluation 以 (topic_id, evaluator_id, eval_role) 唯一,
//       重复提交走 upsert,不产生重复行
// ==========================================

use crate::domain::types::{EvaluationStatus, EvaluatorRole};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Evaluation - 单角色评分记录
// ==========================================
// 对齐: evaluation 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    // ===== 主键 (对齐schema) =====
    pub topic_id: String,          // 课题ID
    pub evaluator_id: String,      // 评审人ID
    pub role: EvaluatorRole,       // 评审角色

    // ===== 提交内容 =====
    pub student_id: String,        // 学生ID (随提交冗余落库)
    pub scores: BTreeMap<String, f64>, // 评分项键 -> 得分 (全精度存储)
    pub comments: Option<String>,  // 自由评语

    // ===== 派生字段 =====
    pub total_score: f64,          // 已提交分项之和 (缺项按 0 计)
    pub has_all_scores: bool,      // 该角色全部分项均有数值

    // ===== 时间戳 =====
    pub created_at: NaiveDateTime, // 首次提交时间
    pub updated_at: NaiveDateTime, // 最近提交时间
}

// ==========================================
// FinalScore - 课题最终成绩 (派生,不落库)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub topic_id: String,               // 课题ID
    pub supervisor_score: Option<f64>,  // 指导教师总分 (完整时才有值)
    pub reviewer_score: Option<f64>,    // 评阅教师总分
    pub committee_score: Option<f64>,   // 答辩委员会总分
    pub final_score: Option<f64>,       // 加权总评 (三方齐备时才有值)
    pub status: EvaluationStatus,       // 评分状态
}

/// 分数输出格式化：保留一位小数
///
/// 存储保持全精度，仅在输出边界使用。
pub fn format_points(value: f64) -> String {
    format!("{:.1}", value)
}
