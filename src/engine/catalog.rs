// ==========================================
// 毕业论文答辩评分系统 - 评分细则引擎
// ==========================================
// 红线: 每个角色的评分细则是封闭常量表,会话期间不变;
//       各角色满分之和恒等于 10.0
// 职责: 细则查询 + 提交校验 + 总分/完整性派生
// ==========================================

use crate::domain::types::EvaluatorRole;
use std::collections::BTreeMap;
use thiserror::Error;

// ==========================================
// Criterion - 单条评分项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    pub key: &'static str,     // 评分项键 (提交映射的键)
    pub label: &'static str,   // 展示名称
    pub max_points: f64,       // 满分
}

// ===== 指导教师细则 (6 项, Σ=10.0) =====
const SUPERVISOR_CRITERIA: [Criterion; 6] = [
    Criterion { key: "student_attitude", label: "学生态度与投入", max_points: 1.0 },
    Criterion { key: "problem_solving", label: "解决问题能力", max_points: 1.0 },
    Criterion { key: "format", label: "论文格式规范", max_points: 1.5 },
    Criterion { key: "content_implementation", label: "内容与实现", max_points: 4.5 },
    Criterion { key: "related_issues", label: "相关问题掌握", max_points: 1.0 },
    Criterion { key: "practical_application", label: "实际应用价值", max_points: 1.0 },
];

// ===== 评阅教师细则 (5 项, Σ=10.0) =====
const REVIEWER_CRITERIA: [Criterion; 5] = [
    Criterion { key: "format", label: "论文格式规范", max_points: 1.5 },
    Criterion { key: "content_quality", label: "内容质量", max_points: 4.0 },
    Criterion { key: "related_issues", label: "相关问题掌握", max_points: 2.0 },
    Criterion { key: "practical_application", label: "实际应用价值", max_points: 2.0 },
    Criterion { key: "bonus", label: "加分项", max_points: 0.5 },
];

// ===== 答辩委员会细则 (6 项, Σ=10.0) =====
const COMMITTEE_CRITERIA: [Criterion; 6] = [
    Criterion { key: "presentation_clarity", label: "陈述清晰度", max_points: 0.5 },
    Criterion { key: "reviewer_qa", label: "评阅问题答辩", max_points: 1.5 },
    Criterion { key: "committee_qa", label: "委员会问题答辩", max_points: 1.5 },
    Criterion { key: "attitude", label: "答辩态度", max_points: 1.0 },
    Criterion { key: "content_implementation", label: "内容与实现", max_points: 4.5 },
    Criterion { key: "related_issues", label: "相关问题掌握", max_points: 1.0 },
];

// ==========================================
// ScoreValidationError - 提交校验错误
// ==========================================
// 本地校验失败,不重试,原样上抛给调用方
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreValidationError {
    #[error("未知评分项: role={role}, key={key}")]
    UnknownCriterion { role: EvaluatorRole, key: String },

    #[error("分值越界: key={key}, value={value}, 允许范围 [0, {max_points}]")]
    ScoreOutOfRange {
        key: String,
        value: f64,
        max_points: f64,
    },
}

// ==========================================
// RoleCriteriaCatalog - 评分细则引擎
// ==========================================
pub struct RoleCriteriaCatalog;

impl RoleCriteriaCatalog {
    /// 查询角色的评分细则 (有序,静态)
    pub fn criteria_for(role: EvaluatorRole) -> &'static [Criterion] {
        match role {
            EvaluatorRole::Supervisor => &SUPERVISOR_CRITERIA,
            EvaluatorRole::Reviewer => &REVIEWER_CRITERIA,
            EvaluatorRole::Committee => &COMMITTEE_CRITERIA,
        }
    }

    /// 按键查询单条评分项
    pub fn find(role: EvaluatorRole, key: &str) -> Option<&'static Criterion> {
        Self::criteria_for(role).iter().find(|c| c.key == key)
    }

    /// 校验一次提交的评分映射
    ///
    /// - 出现该角色细则之外的键 → UnknownCriterion
    /// - 分值非有限数或超出 [0, max_points] → ScoreOutOfRange
    ///
    /// 只校验,不修改;任何失败发生在落库之前。
    pub fn validate_scores(
        role: EvaluatorRole,
        scores: &BTreeMap<String, f64>,
    ) -> Result<(), ScoreValidationError> {
        for (key, value) in scores {
            let criterion = Self::find(role, key).ok_or_else(|| {
                ScoreValidationError::UnknownCriterion {
                    role,
                    key: key.clone(),
                }
            })?;

            if !value.is_finite() || *value < 0.0 || *value > criterion.max_points {
                return Err(ScoreValidationError::ScoreOutOfRange {
                    key: key.clone(),
                    value: *value,
                    max_points: criterion.max_points,
                });
            }
        }

        Ok(())
    }

    /// 已提交分项之和 (缺项按 0 计)
    pub fn total_of(scores: &BTreeMap<String, f64>) -> f64 {
        scores.values().sum()
    }

    /// 该角色全部分项是否均已提交
    pub fn is_complete(role: EvaluatorRole, scores: &BTreeMap<String, f64>) -> bool {
        Self::criteria_for(role)
            .iter()
            .all(|c| scores.contains_key(c.key))
    }
}
