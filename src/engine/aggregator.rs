// ==========================================
// 毕业论文答辩评分系统 - 成绩聚合引擎
// ==========================================
// 职责: 三方评分合成最终成绩 + 状态派生
// 输入: 课题的全部评分记录 (API 层从仓储取好)
// 输出: FinalScore (只读派生,不落库)
// 红线: 权重固定 1:2:1,不可配置;
//       状态只由 derive_status 一处产出
// ==========================================

use crate::domain::evaluation::{Evaluation, FinalScore};
use crate::domain::types::{EvaluationStatus, EvaluatorRole};

/// 指导教师权重
pub const SUPERVISOR_WEIGHT: f64 = 1.0;
/// 评阅教师权重
pub const REVIEWER_WEIGHT: f64 = 2.0;
/// 答辩委员会权重
pub const COMMITTEE_WEIGHT: f64 = 1.0;
/// 权重分母
pub const WEIGHT_TOTAL: f64 = 4.0;

// ==========================================
// ScoreAggregator - 成绩聚合引擎
// ==========================================
pub struct ScoreAggregator {
    // 无状态引擎,不需要注入依赖
    // Repository 操作由调用方处理
}

impl ScoreAggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 合成课题最终成绩
    ///
    /// # 参数
    /// - `topic_id`: 课题ID
    /// - `evaluations`: 该课题的全部评分记录
    ///
    /// # 返回
    /// FinalScore: 各角色总分、加权总评、状态
    ///
    /// 纯函数: 相同输入必得相同输出,重复调用无副作用。
    pub fn final_score_for(&self, topic_id: &str, evaluations: &[Evaluation]) -> FinalScore {
        // 1. 每角色至多取一条记录
        //    upsert 主键保证正常路径下唯一;对手工改库的残留重复行,
        //    取 updated_at 最新的一条
        let supervisor = pick_latest(evaluations, EvaluatorRole::Supervisor);
        let reviewer = pick_latest(evaluations, EvaluatorRole::Reviewer);
        let committee = pick_latest(evaluations, EvaluatorRole::Committee);

        // 2. 角色总分: 记录存在且分项齐备才有值
        let supervisor_score = complete_total(supervisor);
        let reviewer_score = complete_total(reviewer);
        let committee_score = complete_total(committee);

        // 3. 加权总评: 三方齐备才合成
        let final_score = match (supervisor_score, reviewer_score, committee_score) {
            (Some(sup), Some(rev), Some(com)) => Some(
                (sup * SUPERVISOR_WEIGHT + rev * REVIEWER_WEIGHT + com * COMMITTEE_WEIGHT)
                    / WEIGHT_TOTAL,
            ),
            _ => None,
        };

        // 4. 状态派生
        let status = derive_status(&[supervisor, reviewer, committee]);

        FinalScore {
            topic_id: topic_id.to_string(),
            supervisor_score,
            reviewer_score,
            committee_score,
            final_score,
            status,
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 状态派生 (唯一产出点)
// ==========================================

/// 从三个角色的记录状态派生评分状态
///
/// - Completed: 三方记录齐备且分项均完整
/// - Incomplete: 存在分项不完整的记录
/// - Pending: 无记录,或已有记录均完整但三方未齐
///
/// NoScore 不在此产出 (展示层改写,见 EvaluationStatus 注释)。
fn derive_status(records: &[Option<&Evaluation>; 3]) -> EvaluationStatus {
    let all_complete = records
        .iter()
        .all(|r| r.map(|e| e.has_all_scores).unwrap_or(false));
    if all_complete {
        return EvaluationStatus::Completed;
    }

    let any_incomplete = records
        .iter()
        .any(|r| r.map(|e| !e.has_all_scores).unwrap_or(false));
    if any_incomplete {
        return EvaluationStatus::Incomplete;
    }

    EvaluationStatus::Pending
}

/// 选出指定角色最新的一条记录
fn pick_latest(evaluations: &[Evaluation], role: EvaluatorRole) -> Option<&Evaluation> {
    evaluations
        .iter()
        .filter(|e| e.role == role)
        .max_by_key(|e| e.updated_at)
}

/// 记录完整时的总分
fn complete_total(record: Option<&Evaluation>) -> Option<f64> {
    record.filter(|e| e.has_all_scores).map(|e| e.total_score)
}
