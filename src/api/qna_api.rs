// ==========================================
// 毕业论文答辩评分系统 - 答辩问答 API
// ==========================================
// 职责: 问答记录的读取、追加与回答更新,以及秘书权限查询
// 红线: 写入只有秘书;读取放宽到课题相关的任一评审人
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::committee::CommitteeMember;
use crate::domain::qna::QnaEntry;
use crate::engine::access::{AccessGuard, GuardAction};
use crate::repository::committee_repo::CommitteeRepository;
use crate::repository::qna_repo::QnaRepository;

// ==========================================
// 请求/响应 DTO
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddQuestionRequest {
    pub topic_id: String,       // 课题ID
    pub student_id: String,     // 学生ID
    pub questioner_id: String,  // 提问人 (须为委员会成员)
    pub secretary_id: String,   // 记录人 (答辩秘书)
    pub question: String,       // 问题内容
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnswerRequest {
    pub answer: String,         // 回答内容
    pub secretary_id: String,   // 记录人 (答辩秘书)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretaryAccess {
    pub has_access: bool,
}

// ==========================================
// QnaApi - 答辩问答 API
// ==========================================
pub struct QnaApi {
    qna_repo: Arc<QnaRepository>,
    committee_repo: Arc<CommitteeRepository>,
    guard: Arc<AccessGuard>,
}

impl QnaApi {
    /// 创建新的 QnaApi 实例
    pub fn new(
        qna_repo: Arc<QnaRepository>,
        committee_repo: Arc<CommitteeRepository>,
        guard: Arc<AccessGuard>,
    ) -> Self {
        Self {
            qna_repo,
            committee_repo,
            guard,
        }
    }

    // ==========================================
    // 读取接口
    // ==========================================

    /// 查询课题的问答记录,按提问时间升序
    ///
    /// # 参数
    /// - `topic_id`: 课题ID
    /// - `reader_id`: 读取人 (课题相关的任一评审人可读)
    pub fn get_qna_by_topic(&self, topic_id: &str, reader_id: &str) -> ApiResult<Vec<QnaEntry>> {
        let allowed = self
            .guard
            .authorize(reader_id, topic_id, GuardAction::ReadQna)?;
        if !allowed {
            return Err(ApiError::NoAccess(format!(
                "{} 无权查看课题 {} 的问答记录",
                reader_id, topic_id
            )));
        }

        Ok(self.qna_repo.list_by_topic(topic_id)?)
    }

    /// 查询课题的委员会成员列表
    pub fn get_committee_by_topic(&self, topic_id: &str) -> ApiResult<Vec<CommitteeMember>> {
        if topic_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("课题ID不能为空".to_string()));
        }
        Ok(self.committee_repo.list_members(topic_id)?)
    }

    /// 秘书权限查询 (UI 据此决定是否展示录入入口)
    pub fn check_secretary_access(
        &self,
        topic_id: &str,
        secretary_id: &str,
    ) -> ApiResult<SecretaryAccess> {
        let has_access = self
            .guard
            .authorize(secretary_id, topic_id, GuardAction::AddQuestion)?;
        Ok(SecretaryAccess { has_access })
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 追加一条答辩问题
    ///
    /// 顺序: 入参检查 → 秘书权限 → 提问人资格 → 落库。
    ///
    /// # 返回
    /// - Ok(QnaEntry): 落库后的记录 (question_time = now, 无回答)
    pub fn add_question(&self, request: AddQuestionRequest) -> ApiResult<QnaEntry> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(ApiError::EmptyQuestionText);
        }

        // 权限: 记录人必须是课题的答辩秘书
        let allowed = self
            .guard
            .authorize(&request.secretary_id, &request.topic_id, GuardAction::AddQuestion)?;
        if !allowed {
            return Err(ApiError::NoAccess(format!(
                "{} 不是课题 {} 的答辩秘书",
                request.secretary_id, request.topic_id
            )));
        }

        // 提问人必须在委员会名单内
        if !self
            .committee_repo
            .is_member(&request.topic_id, &request.questioner_id)?
        {
            return Err(ApiError::InvalidInput(format!(
                "提问人 {} 不在课题 {} 的答辩委员会名单内",
                request.questioner_id, request.topic_id
            )));
        }

        let entry = QnaEntry {
            qna_id: Uuid::new_v4().to_string(),
            topic_id: request.topic_id,
            student_id: request.student_id,
            questioner_id: request.questioner_id,
            secretary_id: request.secretary_id,
            question: question.to_string(),
            answer: None,
            question_time: Utc::now().naive_utc(),
            answer_time: None,
        };

        let qna_id = self.qna_repo.insert(&entry)?;
        info!(qna_id = %qna_id, topic_id = %entry.topic_id, "答辩问题已记录");

        self.qna_repo
            .find_by_id(&qna_id)?
            .ok_or_else(|| ApiError::InternalError("问答记录落库后回读失败".to_string()))
    }

    /// 记录/更正回答
    ///
    /// 已有回答会被覆盖 (更正流程,见仓储注释)。
    ///
    /// # 返回
    /// - Ok(QnaEntry): 更新后的记录
    /// - Err(NotFound): qna_id 不存在
    pub fn update_answer(&self, qna_id: &str, request: UpdateAnswerRequest) -> ApiResult<QnaEntry> {
        let answer = request.answer.trim();
        if answer.is_empty() {
            return Err(ApiError::MissingRequiredField("answer".to_string()));
        }

        // 先定位记录,按其课题校验秘书权限
        let entry = self
            .qna_repo
            .find_by_id(qna_id)?
            .ok_or_else(|| ApiError::NotFound(format!("QnaEntry (id={})", qna_id)))?;

        let allowed = self
            .guard
            .authorize(&request.secretary_id, &entry.topic_id, GuardAction::SetAnswer)?;
        if !allowed {
            return Err(ApiError::NoAccess(format!(
                "{} 不是课题 {} 的答辩秘书",
                request.secretary_id, entry.topic_id
            )));
        }

        let updated = self.qna_repo.update_answer(qna_id, answer)?;
        info!(qna_id = %qna_id, topic_id = %updated.topic_id, "答辩回答已更新");
        Ok(updated)
    }
}
