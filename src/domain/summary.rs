// ==========================================
// 毕业论文答辩评分系统 - 评语文档领域模型
// ==========================================
// 存储: summary_document 表,每 (topic_id, doc_role) 仅一份
// 编码: 带 schema_version 判别字段的 JSON (见 SummaryEnvelope)
// 兼容: 无法解析的旧版纯文本按原文落入各角色的兜底字段
// ==========================================

use crate::domain::types::EvaluatorRole;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 当前评语结构版本号
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

// ==========================================
// SupervisorSummaryContent - 指导教师评语
// ==========================================
// 3 个叙述段 + 结论
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorSummaryContent {
    #[serde(default)]
    pub attitude_effort: String,   // 学生态度与投入
    #[serde(default)]
    pub content_quality: String,   // 内容与成果质量 (旧版纯文本兜底字段)
    #[serde(default)]
    pub pros_cons: String,         // 优缺点
    #[serde(default)]
    pub conclusion_approve: Option<bool>, // 是否同意答辩
    #[serde(default)]
    pub conclusion_note: String,   // 结论备注
}

// ==========================================
// ReviewerSummaryContent - 评阅教师评语
// ==========================================
// 13 个评阅要点 + 结论
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSummaryContent {
    #[serde(default)]
    pub topic_necessity: String,      // 选题必要性
    #[serde(default)]
    pub subject_scope_fit: String,    // 与专业方向契合度
    #[serde(default)]
    pub approach_validity: String,    // 技术路线合理性
    #[serde(default)]
    pub scientific_soundness: String, // 科学性
    #[serde(default)]
    pub practical_value: String,      // 实用价值
    #[serde(default)]
    pub layout_compliance: String,    // 排版规范性
    #[serde(default)]
    pub content_completeness: String, // 内容完整性
    #[serde(default)]
    pub methodology: String,          // 研究方法
    #[serde(default)]
    pub results: String,              // 成果
    #[serde(default)]
    pub pros: String,                 // 优点
    #[serde(default)]
    pub cons: String,                 // 不足
    #[serde(default)]
    pub attitude: String,             // 工作态度
    #[serde(default)]
    pub additional_remarks: String,   // 其他意见 (旧版纯文本兜底字段)
    #[serde(default)]
    pub conclusion_approve: Option<bool>, // 是否同意答辩
    #[serde(default)]
    pub conclusion_note: String,      // 结论备注
}

// ==========================================
// CommitteeSummaryContent - 答辩委员会评语
// ==========================================
// 5 个记录段,无单独结论标志
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeSummaryContent {
    #[serde(default)]
    pub presentation: String,      // 陈述表现
    #[serde(default)]
    pub answers: String,           // 答问情况
    #[serde(default)]
    pub content: String,           // 内容评价
    #[serde(default)]
    pub format: String,            // 格式评价
    #[serde(default)]
    pub overall: String,           // 总体意见 (旧版纯文本兜底字段)
    #[serde(default)]
    pub conclusion_note: String,   // 结论备注
}

// ==========================================
// SummaryContent - 按角色判别的评语内容
// ==========================================
// 编码时 role 标签随内容一起写入,解码按标签分发
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum SummaryContent {
    #[serde(rename = "SUPERVISOR")]
    Supervisor(SupervisorSummaryContent),
    #[serde(rename = "REVIEWER")]
    Reviewer(ReviewerSummaryContent),
    #[serde(rename = "COMMITTEE")]
    Committee(CommitteeSummaryContent),
}

impl SummaryContent {
    /// 内容所属角色
    pub fn role(&self) -> EvaluatorRole {
        match self {
            SummaryContent::Supervisor(_) => EvaluatorRole::Supervisor,
            SummaryContent::Reviewer(_) => EvaluatorRole::Reviewer,
            SummaryContent::Committee(_) => EvaluatorRole::Committee,
        }
    }

    /// 将旧版纯文本包装为结构化内容
    ///
    /// 原文逐字落入对应角色的兜底字段,其余字段为空。
    pub fn from_legacy_text(role: EvaluatorRole, raw: &str) -> SummaryContent {
        match role {
            EvaluatorRole::Supervisor => SummaryContent::Supervisor(SupervisorSummaryContent {
                content_quality: raw.to_string(),
                ..Default::default()
            }),
            EvaluatorRole::Reviewer => SummaryContent::Reviewer(ReviewerSummaryContent {
                additional_remarks: raw.to_string(),
                ..Default::default()
            }),
            EvaluatorRole::Committee => SummaryContent::Committee(CommitteeSummaryContent {
                overall: raw.to_string(),
                ..Default::default()
            }),
        }
    }
}

// ==========================================
// SummaryEnvelope - 存储编码信封
// ==========================================
// 判别字段 schema_version 与 role 一并落库,
// 未知的多余字段在解码时忽略 (向前兼容)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEnvelope {
    pub schema_version: u32,
    #[serde(flatten)]
    pub content: SummaryContent,
}

// ==========================================
// SummaryDocument - 读取视图
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub topic_id: String,          // 课题ID
    pub role: EvaluatorRole,       // 文档角色
    pub author_id: String,         // 最近写入人
    pub content: SummaryContent,   // 结构化内容
    pub updated_at: NaiveDateTime, // 最近写入时间
    pub legacy_fallback: bool,     // 本次读取是否走了旧版纯文本兜底
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let content = SummaryContent::Supervisor(SupervisorSummaryContent {
            attitude_effort: "认真投入".to_string(),
            content_quality: "内容扎实".to_string(),
            pros_cons: "文献略少".to_string(),
            conclusion_approve: Some(true),
            conclusion_note: "同意答辩".to_string(),
        });
        let envelope = SummaryEnvelope {
            schema_version: SUMMARY_SCHEMA_VERSION,
            content: content.clone(),
        };

        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: SummaryEnvelope = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.schema_version, SUMMARY_SCHEMA_VERSION);
        assert_eq!(decoded.content, content);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{
            "schema_version": 1,
            "role": "COMMITTEE",
            "presentation": "清晰",
            "future_field": "ignored"
        }"#;

        let decoded: SummaryEnvelope = serde_json::from_str(json).unwrap();
        match decoded.content {
            SummaryContent::Committee(c) => {
                assert_eq!(c.presentation, "清晰");
                assert_eq!(c.overall, "");
            }
            other => panic!("角色解码错误: {:?}", other),
        }
    }

    #[test]
    fn test_legacy_text_落入兜底字段() {
        let raw = "论文整体尚可，建议补充实验数据。";
        match SummaryContent::from_legacy_text(EvaluatorRole::Reviewer, raw) {
            SummaryContent::Reviewer(c) => assert_eq!(c.additional_remarks, raw),
            other => panic!("角色包装错误: {:?}", other),
        }
    }
}
