// ==========================================
// 毕业论文答辩评分系统 - 评分 API
// ==========================================
// 职责: 评分提交、课题评分查询、最终成绩合成、评审任务列表
// 架构: API 层 → 权限引擎 → 细则引擎 → 仓储
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::evaluation::{format_points, Evaluation, FinalScore};
use crate::domain::types::{EvaluationStatus, EvaluatorRole, TaskScope};
use crate::engine::access::{AccessGuard, GuardAction};
use crate::engine::aggregator::ScoreAggregator;
use crate::engine::catalog::RoleCriteriaCatalog;
use crate::repository::committee_repo::CommitteeRepository;
use crate::repository::evaluation_repo::EvaluationRepository;

// ==========================================
// SubmitEvaluationRequest - 评分提交请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub topic_id: String,                  // 课题ID
    pub student_id: String,                // 学生ID
    pub evaluator_id: String,              // 评审人ID
    pub evaluation_type: EvaluatorRole,    // 评审角色
    #[serde(default)]
    pub comments: Option<String>,          // 自由评语
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,     // 评分项键 -> 得分
}

// ==========================================
// EvaluatorTask - 评审任务行
// ==========================================
// 答辩场次由外部排程系统指派,这里只消费 课题/角色/日期 字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorTask {
    pub topic_id: String,                  // 课题ID
    pub student_id: String,                // 学生ID
    pub evaluation_type: EvaluatorRole,    // 评审角色
    pub evaluation_status: EvaluationStatus, // 该角色的评分状态
    pub defense_date: Option<NaiveDate>,   // 答辩日期
    pub defense_time: Option<String>,      // 答辩时间段
    pub location: Option<String>,          // 答辩地点
}

// ==========================================
// EvaluationApi - 评分 API
// ==========================================
pub struct EvaluationApi {
    evaluation_repo: Arc<EvaluationRepository>,
    committee_repo: Arc<CommitteeRepository>,
    guard: Arc<AccessGuard>,
    aggregator: ScoreAggregator,
}

impl EvaluationApi {
    /// 创建新的 EvaluationApi 实例
    pub fn new(
        evaluation_repo: Arc<EvaluationRepository>,
        committee_repo: Arc<CommitteeRepository>,
        guard: Arc<AccessGuard>,
    ) -> Self {
        Self {
            evaluation_repo,
            committee_repo,
            guard,
            aggregator: ScoreAggregator::new(),
        }
    }

    // ==========================================
    // 评分提交
    // ==========================================

    /// 提交一次评分 (首次提交或覆盖重交)
    ///
    /// 顺序: 入参检查 → 权限 → 细则校验 → upsert,任何失败发生在落库之前。
    ///
    /// # 返回
    /// - Ok(Evaluation): 落库后的记录
    /// - Err(ApiError): 校验/权限/数据库错误
    pub fn submit_evaluation(&self, request: SubmitEvaluationRequest) -> ApiResult<Evaluation> {
        if request.topic_id.trim().is_empty() {
            return Err(ApiError::MissingRequiredField("topic_id".to_string()));
        }
        if request.evaluator_id.trim().is_empty() {
            return Err(ApiError::MissingRequiredField("evaluator_id".to_string()));
        }

        let role = request.evaluation_type;

        // 权限: 必须是课题上被指派的对应角色
        let allowed = self
            .guard
            .authorize(&request.evaluator_id, &request.topic_id, GuardAction::SubmitEvaluation(role))?;
        if !allowed {
            return Err(ApiError::NoAccess(format!(
                "评审人 {} 不是课题 {} 的 {} 角色",
                request.evaluator_id, request.topic_id, role
            )));
        }

        // 细则校验: 未知键/越界分值在此拒绝
        RoleCriteriaCatalog::validate_scores(role, &request.scores)?;

        let total_score = RoleCriteriaCatalog::total_of(&request.scores);
        let has_all_scores = RoleCriteriaCatalog::is_complete(role, &request.scores);

        // 存储为秒级精度,先截断保证回读一致
        let now_raw = Utc::now().naive_utc();
        let now = now_raw.with_nanosecond(0).unwrap_or(now_raw);
        let evaluation = Evaluation {
            topic_id: request.topic_id.clone(),
            evaluator_id: request.evaluator_id.clone(),
            role,
            student_id: request.student_id,
            scores: request.scores,
            comments: request.comments,
            total_score,
            has_all_scores,
            created_at: now,
            updated_at: now,
        };

        self.evaluation_repo.upsert(&evaluation)?;

        // 输出边界统一一位小数,存储保持全精度
        info!(
            topic_id = %evaluation.topic_id,
            evaluator_id = %evaluation.evaluator_id,
            role = %role,
            total_score = %format_points(total_score),
            has_all_scores,
            "评分已提交"
        );

        // 回读落库行 (created_at 以首次提交为准)
        let stored = self
            .evaluation_repo
            .find(&evaluation.topic_id, &evaluation.evaluator_id, role)?
            .ok_or_else(|| ApiError::InternalError("评分落库后回读失败".to_string()))?;

        Ok(stored)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询课题的全部评分记录
    ///
    /// 顺序确定: 指导教师 → 评阅教师 → 答辩委员会
    pub fn get_evaluations_by_topic(&self, topic_id: &str) -> ApiResult<Vec<Evaluation>> {
        if topic_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("课题ID不能为空".to_string()));
        }
        Ok(self.evaluation_repo.list_by_topic(topic_id)?)
    }

    /// 合成课题最终成绩
    ///
    /// 只读派生: 无任何写入,重复调用结果一致。
    pub fn get_final_score(&self, topic_id: &str) -> ApiResult<FinalScore> {
        if topic_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("课题ID不能为空".to_string()));
        }
        let evaluations = self.evaluation_repo.list_by_topic(topic_id)?;
        Ok(self.aggregator.final_score_for(topic_id, &evaluations))
    }

    /// 查询评审人的任务列表
    ///
    /// # 参数
    /// - `evaluator_id`: 评审人ID
    /// - `date`: 只保留该答辩日期的任务;None 不过滤
    /// - `scope`: All / Pending (未完成) / Completed (已完成)
    ///
    /// 状态改写: 答辩日期已过且该角色无任何评分记录时,
    /// Pending 在此改写为 NoScore (不再预期评分)。聚合引擎不产出 NoScore。
    pub fn get_evaluator_tasks(
        &self,
        evaluator_id: &str,
        date: Option<NaiveDate>,
        scope: TaskScope,
    ) -> ApiResult<Vec<EvaluatorTask>> {
        if evaluator_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("评审人ID不能为空".to_string()));
        }

        let assignments = self.committee_repo.list_assignments_for_evaluator(evaluator_id)?;
        let today = Local::now().date_naive();

        let mut tasks = Vec::with_capacity(assignments.len());
        for (assignment, role) in assignments {
            if let Some(filter_date) = date {
                if assignment.defense_date != Some(filter_date) {
                    continue;
                }
            }

            let record = self
                .evaluation_repo
                .find(&assignment.topic_id, evaluator_id, role)?;
            let status = task_status(record.as_ref(), assignment.defense_date, today);

            let keep = match scope {
                TaskScope::All => true,
                TaskScope::Pending => status != EvaluationStatus::Completed,
                TaskScope::Completed => status == EvaluationStatus::Completed,
            };
            if !keep {
                continue;
            }

            tasks.push(EvaluatorTask {
                topic_id: assignment.topic_id,
                student_id: assignment.student_id,
                evaluation_type: role,
                evaluation_status: status,
                defense_date: assignment.defense_date,
                defense_time: assignment.defense_time,
                location: assignment.location,
            });
        }

        Ok(tasks)
    }
}

// ==========================================
// 辅助方法
// ==========================================

/// 单角色任务状态
///
/// - 有记录: 分项齐备 → Completed,否则 Incomplete
/// - 无记录: 答辩日期已过 → NoScore (展示层改写),否则 Pending
fn task_status(
    record: Option<&Evaluation>,
    defense_date: Option<NaiveDate>,
    today: NaiveDate,
) -> EvaluationStatus {
    match record {
        Some(e) if e.has_all_scores => EvaluationStatus::Completed,
        Some(_) => EvaluationStatus::Incomplete,
        None => match defense_date {
            Some(d) if d < today => EvaluationStatus::NoScore,
            _ => EvaluationStatus::Pending,
        },
    }
}
