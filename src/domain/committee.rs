// ==========================================
// 毕业论文答辩评分系统 - 委员会与分配关系领域模型
// ==========================================
// 红线: 这些是外部系统指派的既定事实,本核心只消费不推导
// 对齐: defense_committee / topic_assignment 表
// ==========================================

use crate::domain::types::CommitteeRole;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CommitteeMember - 答辩委员会成员
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub committee_id: String,   // 委员会ID
    pub topic_id: String,       // 课题ID
    pub lecturer_id: String,    // 教师ID
    pub role: CommitteeRole,    // 主席 / 秘书 / 委员
}

// ==========================================
// TopicAssignment - 课题分配关系
// ==========================================
// 指导教师、评阅教师与答辩场次由外部排程系统指派
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub topic_id: String,               // 课题ID
    pub student_id: String,             // 学生ID
    pub supervisor_id: String,          // 指导教师ID
    pub reviewer_id: String,            // 评阅教师ID
    pub defense_date: Option<NaiveDate>, // 答辩日期
    pub defense_time: Option<String>,   // 答辩时间段 (外部系统给定的展示文本)
    pub location: Option<String>,       // 答辩地点
}
