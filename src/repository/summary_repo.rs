// ==========================================
// 毕业论文答辩评分系统 - 评语文档数据仓储
// ==========================================
// 对齐: summary_document 表
// 红线: 每 (topic_id, doc_role) 仅一份,写入即覆盖,不留历史
// 兼容: 旧版纯文本正文在读取时兜底,也可由 promote_legacy 一次性迁移
// ==========================================

use crate::domain::summary::{
    SummaryContent, SummaryDocument, SummaryEnvelope, SUMMARY_SCHEMA_VERSION,
};
use crate::domain::types::EvaluatorRole;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TIMESTAMP_FORMAT;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// SummaryRepository - 评语文档仓储
// ==========================================
pub struct SummaryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SummaryRepository {
    /// 创建新的评语文档仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入或覆盖评语文档
    ///
    /// 编码为带 schema_version 的 JSON 后整行覆盖,单语句原子生效。
    ///
    /// # 参数
    /// - `topic_id`: 课题ID
    /// - `author_id`: 写入人 (权限已在 API 层校验)
    /// - `content`: 结构化评语内容 (角色由内容自带)
    pub fn upsert(
        &self,
        topic_id: &str,
        author_id: &str,
        content: &SummaryContent,
    ) -> RepositoryResult<()> {
        let envelope = SummaryEnvelope {
            schema_version: SUMMARY_SCHEMA_VERSION,
            content: content.clone(),
        };
        let payload_json = serde_json::to_string(&envelope)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "payload".to_string(),
                message: e.to_string(),
            })?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO summary_document (topic_id, doc_role, author_id, payload_json, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(topic_id, doc_role) DO UPDATE SET
                author_id = excluded.author_id,
                payload_json = excluded.payload_json,
                updated_at = excluded.updated_at
            "#,
            params![
                topic_id,
                content.role().as_str(),
                author_id,
                payload_json,
                Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 (topic_id, role) 查询评语文档
    ///
    /// 结构化解码失败不报错: 原始正文逐字落入该角色的兜底字段返回
    /// (legacy_fallback = true),保证旧数据永远可读。
    pub fn get(
        &self,
        topic_id: &str,
        role: EvaluatorRole,
    ) -> RepositoryResult<Option<SummaryDocument>> {
        let conn = self.get_conn()?;

        let row = conn.query_row(
            r#"
            SELECT author_id, payload_json, updated_at
            FROM summary_document
            WHERE topic_id = ? AND doc_role = ?
            "#,
            params![topic_id, role.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        );

        let (author_id, payload_json, updated_at_str) = match row {
            Ok(values) => values,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let updated_at = parse_timestamp(&updated_at_str)?;
        let (content, legacy_fallback) = decode_payload(topic_id, role, &payload_json);

        Ok(Some(SummaryDocument {
            topic_id: topic_id.to_string(),
            role,
            author_id,
            content,
            updated_at,
            legacy_fallback,
        }))
    }

    // ==========================================
    // 旧数据迁移
    // ==========================================

    /// 一次性迁移旧版纯文本评语
    ///
    /// 扫描存量行,无法按结构化编码解析的正文重新编码为结构化形式
    /// (原文落入兜底字段)。已是结构化编码的行不动。
    ///
    /// # 参数
    /// - `topic_id`: 只迁移指定课题;None 则全库扫描
    ///
    /// # 返回
    /// 被迁移的行数
    pub fn promote_legacy(&self, topic_id: Option<&str>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let mut stmt = match topic_id {
            Some(_) => conn.prepare(
                "SELECT topic_id, doc_role, payload_json FROM summary_document WHERE topic_id = ?1",
            )?,
            None => conn.prepare("SELECT topic_id, doc_role, payload_json FROM summary_document")?,
        };

        let rows: Vec<(String, String, String)> = match topic_id {
            Some(tid) => stmt.query_map(params![tid], map_promote_row)?,
            None => stmt.query_map([], map_promote_row)?,
        }
        .collect::<SqliteResult<Vec<_>>>()?;
        drop(stmt);

        let mut promoted = 0usize;
        for (tid, role_str, payload_json) in rows {
            let Some(role) = EvaluatorRole::parse(&role_str) else {
                warn!(topic_id = %tid, doc_role = %role_str, "跳过无效角色码的评语行");
                continue;
            };

            if serde_json::from_str::<SummaryEnvelope>(&payload_json).is_ok() {
                continue; // 已是结构化编码
            }

            let envelope = SummaryEnvelope {
                schema_version: SUMMARY_SCHEMA_VERSION,
                content: SummaryContent::from_legacy_text(role, &payload_json),
            };
            let promoted_json = serde_json::to_string(&envelope)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "payload".to_string(),
                    message: e.to_string(),
                })?;

            conn.execute(
                r#"
                UPDATE summary_document
                SET payload_json = ?1, updated_at = ?2
                WHERE topic_id = ?3 AND doc_role = ?4
                "#,
                params![
                    promoted_json,
                    Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string(),
                    tid,
                    role_str,
                ],
            )?;
            promoted += 1;
        }

        if promoted > 0 {
            info!(promoted, "旧版评语迁移完成");
        }
        Ok(promoted)
    }
}

// ==========================================
// 辅助方法
// ==========================================

fn map_promote_row(row: &rusqlite::Row) -> SqliteResult<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn parse_timestamp(s: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| {
        RepositoryError::FieldValueError {
            field: "updated_at".to_string(),
            message: e.to_string(),
        }
    })
}

/// 解码存储正文;失败走旧版纯文本兜底
fn decode_payload(
    topic_id: &str,
    role: EvaluatorRole,
    payload_json: &str,
) -> (SummaryContent, bool) {
    match serde_json::from_str::<SummaryEnvelope>(payload_json) {
        Ok(envelope) => (envelope.content, false),
        Err(e) => {
            warn!(
                topic_id = %topic_id,
                role = %role,
                error = %e,
                "评语正文非结构化编码,按旧版纯文本兜底"
            );
            (SummaryContent::from_legacy_text(role, payload_json), true)
        }
    }
}
