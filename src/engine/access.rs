// ==========================================
// 毕业论文答辩评分系统 - 权限引擎
// ==========================================
// 职责: 判定 (身份, 课题, 操作) 是否放行
// 红线: 指派关系是外部既定事实,这里只读取比对,不做指派;
//       身份必须显式入参,禁止隐式"当前用户"
// ==========================================

use crate::domain::types::{CommitteeRole, EvaluatorRole};
use crate::repository::committee_repo::CommitteeRepository;
use crate::repository::error::RepositoryResult;
use std::sync::Arc;

// ==========================================
// GuardAction - 受控操作
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    SubmitEvaluation(EvaluatorRole), // 提交对应角色的评分
    UpsertSummary(EvaluatorRole),    // 写入对应角色的评语文档
    AddQuestion,                     // 追加答辩问题 (秘书)
    SetAnswer,                       // 记录/更正回答 (秘书)
    ReadQna,                         // 查看问答记录 (课题相关评审人)
}

// ==========================================
// AccessGuard - 权限引擎
// ==========================================
pub struct AccessGuard {
    committee_repo: Arc<CommitteeRepository>,
}

impl AccessGuard {
    /// 构造函数
    ///
    /// # 参数
    /// - `committee_repo`: 委员会/分配关系仓储 (只读使用)
    pub fn new(committee_repo: Arc<CommitteeRepository>) -> Self {
        Self { committee_repo }
    }

    /// 判定操作是否放行
    ///
    /// 课题无分配关系时一律拒绝 (fail closed)。
    ///
    /// # 参数
    /// - `identity`: 调用方身份 (外部认证得到的教师ID)
    /// - `topic_id`: 课题ID
    /// - `action`: 受控操作
    ///
    /// # 返回
    /// - Ok(true): 放行
    /// - Ok(false): 拒绝
    /// - Err(...): 仓储错误
    pub fn authorize(
        &self,
        identity: &str,
        topic_id: &str,
        action: GuardAction,
    ) -> RepositoryResult<bool> {
        let Some(assignment) = self.committee_repo.get_assignment(topic_id)? else {
            return Ok(false);
        };

        let allowed = match action {
            GuardAction::SubmitEvaluation(EvaluatorRole::Supervisor) => {
                identity == assignment.supervisor_id
            }
            GuardAction::SubmitEvaluation(EvaluatorRole::Reviewer) => {
                identity == assignment.reviewer_id
            }
            GuardAction::SubmitEvaluation(EvaluatorRole::Committee) => {
                self.committee_repo.is_member(topic_id, identity)?
            }

            GuardAction::UpsertSummary(EvaluatorRole::Supervisor) => {
                identity == assignment.supervisor_id
            }
            GuardAction::UpsertSummary(EvaluatorRole::Reviewer) => {
                identity == assignment.reviewer_id
            }
            // 委员会评语只有主席可写
            GuardAction::UpsertSummary(EvaluatorRole::Committee) => {
                self.committee_repo.find_member_role(topic_id, identity)?
                    == Some(CommitteeRole::Chairman)
            }

            // 问答记录只有秘书可写
            GuardAction::AddQuestion | GuardAction::SetAnswer => {
                self.committee_repo.find_member_role(topic_id, identity)?
                    == Some(CommitteeRole::Secretary)
            }

            // 读问答: 课题相关的任一评审人
            GuardAction::ReadQna => {
                identity == assignment.supervisor_id
                    || identity == assignment.reviewer_id
                    || self.committee_repo.is_member(topic_id, identity)?
            }
        };

        Ok(allowed)
    }
}
