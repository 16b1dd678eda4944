// ==========================================
// 毕业论文答辩评分系统 - 答辩问答领域模型
// ==========================================
// 红线: 问题只追加;回答由秘书更新 (允许覆盖,见 update_answer)
// 对齐: qna_entry 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// QnaEntry - 答辩问答记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QnaEntry {
    pub qna_id: String,                    // 记录ID (uuid)
    pub topic_id: String,                  // 课题ID
    pub student_id: String,                // 学生ID
    pub questioner_id: String,             // 提问人 (必须为委员会成员)
    pub secretary_id: String,              // 记录人 (答辩秘书)
    pub question: String,                  // 问题内容
    pub answer: Option<String>,            // 回答内容 (未回答时为 None)
    pub question_time: NaiveDateTime,      // 提问时间
    pub answer_time: Option<NaiveDateTime>, // 回答时间
}

impl QnaEntry {
    /// 是否已有回答
    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().map(str::trim).is_some_and(|a| !a.is_empty())
    }
}
