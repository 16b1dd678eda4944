// ==========================================
// 毕业论文答辩评分系统 - 评语文档 API
// ==========================================
// 职责: 三类评语文档的读取与受控写入
// 红线: 单一写入者 —— 指导评语只有指导教师、评阅评语只有评阅教师、
//       委员会评语只有主席可写
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::summary::{
    CommitteeSummaryContent, ReviewerSummaryContent, SummaryContent, SummaryDocument,
    SupervisorSummaryContent,
};
use crate::domain::types::EvaluatorRole;
use crate::engine::access::{AccessGuard, GuardAction};
use crate::repository::summary_repo::SummaryRepository;

// ==========================================
// SummaryApi - 评语文档 API
// ==========================================
pub struct SummaryApi {
    summary_repo: Arc<SummaryRepository>,
    guard: Arc<AccessGuard>,
}

impl SummaryApi {
    /// 创建新的 SummaryApi 实例
    pub fn new(summary_repo: Arc<SummaryRepository>, guard: Arc<AccessGuard>) -> Self {
        Self { summary_repo, guard }
    }

    // ==========================================
    // 指导教师评语
    // ==========================================

    /// 读取指导教师评语 (缺席返回 None,旧版正文自动兜底)
    pub fn get_supervisor_summary(&self, topic_id: &str) -> ApiResult<Option<SummaryDocument>> {
        Ok(self.summary_repo.get(topic_id, EvaluatorRole::Supervisor)?)
    }

    /// 写入指导教师评语 (覆盖写)
    pub fn upsert_supervisor_summary(
        &self,
        topic_id: &str,
        supervisor_id: &str,
        payload: SupervisorSummaryContent,
    ) -> ApiResult<()> {
        self.upsert(
            topic_id,
            supervisor_id,
            SummaryContent::Supervisor(payload),
        )
    }

    // ==========================================
    // 评阅教师评语
    // ==========================================

    /// 读取评阅教师评语
    pub fn get_reviewer_summary(&self, topic_id: &str) -> ApiResult<Option<SummaryDocument>> {
        Ok(self.summary_repo.get(topic_id, EvaluatorRole::Reviewer)?)
    }

    /// 写入评阅教师评语 (覆盖写)
    pub fn upsert_reviewer_summary(
        &self,
        topic_id: &str,
        reviewer_id: &str,
        payload: ReviewerSummaryContent,
    ) -> ApiResult<()> {
        self.upsert(topic_id, reviewer_id, SummaryContent::Reviewer(payload))
    }

    // ==========================================
    // 答辩委员会评语
    // ==========================================

    /// 读取答辩委员会评语
    pub fn get_council_summary(&self, topic_id: &str) -> ApiResult<Option<SummaryDocument>> {
        Ok(self.summary_repo.get(topic_id, EvaluatorRole::Committee)?)
    }

    /// 写入答辩委员会评语 (仅主席,覆盖写)
    pub fn upsert_council_summary(
        &self,
        topic_id: &str,
        chairman_id: &str,
        payload: CommitteeSummaryContent,
    ) -> ApiResult<()> {
        self.upsert(topic_id, chairman_id, SummaryContent::Committee(payload))
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 权限 → 落库,失败即中止
    fn upsert(&self, topic_id: &str, author_id: &str, content: SummaryContent) -> ApiResult<()> {
        if topic_id.trim().is_empty() {
            return Err(ApiError::MissingRequiredField("topic_id".to_string()));
        }

        let role = content.role();
        let allowed = self
            .guard
            .authorize(author_id, topic_id, GuardAction::UpsertSummary(role))?;
        if !allowed {
            return Err(ApiError::NoAccess(format!(
                "{} 无权写入课题 {} 的 {} 评语",
                author_id, topic_id, role
            )));
        }

        self.summary_repo.upsert(topic_id, author_id, &content)?;
        info!(topic_id = %topic_id, author_id = %author_id, role = %role, "评语已写入");
        Ok(())
    }
}
