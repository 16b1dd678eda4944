use super::core::EvaluationRepository;
use crate::domain::evaluation::Evaluation;
use crate::domain::types::EvaluatorRole;
use crate::repository::error::RepositoryResult;
use crate::repository::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};
use std::collections::BTreeMap;

/// evaluation 表统一列清单
const EVALUATION_COLUMNS: &str = r#"topic_id, evaluator_id, eval_role, student_id,
       scores_json, comments, total_score, has_all_scores,
       created_at, updated_at"#;

impl EvaluationRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按主键查询单条评分记录
    pub fn find(
        &self,
        topic_id: &str,
        evaluator_id: &str,
        role: EvaluatorRole,
    ) -> RepositoryResult<Option<Evaluation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {EVALUATION_COLUMNS}
            FROM evaluation
            WHERE topic_id = ? AND evaluator_id = ? AND eval_role = ?
            "#,
        ))?;

        match stmt.query_row(params![topic_id, evaluator_id, role.as_str()], map_row) {
            Ok(evaluation) => Ok(Some(evaluation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询课题的全部评分记录
    ///
    /// 顺序确定: 指导教师 → 评阅教师 → 答辩委员会,同角色内按评审人ID升序
    pub fn list_by_topic(&self, topic_id: &str) -> RepositoryResult<Vec<Evaluation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {EVALUATION_COLUMNS}
            FROM evaluation
            WHERE topic_id = ?
            ORDER BY CASE eval_role
                         WHEN 'SUPERVISOR' THEN 0
                         WHEN 'REVIEWER' THEN 1
                         ELSE 2
                     END,
                     evaluator_id ASC
            "#,
        ))?;

        let evaluations = stmt
            .query_map(params![topic_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(evaluations)
    }

    /// 查询评审人的全部评分记录
    pub fn list_by_evaluator(&self, evaluator_id: &str) -> RepositoryResult<Vec<Evaluation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {EVALUATION_COLUMNS}
            FROM evaluation
            WHERE evaluator_id = ?
            ORDER BY topic_id ASC,
                     CASE eval_role
                         WHEN 'SUPERVISOR' THEN 0
                         WHEN 'REVIEWER' THEN 1
                         ELSE 2
                     END
            "#,
        ))?;

        let evaluations = stmt
            .query_map(params![evaluator_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(evaluations)
    }

    /// 统计课题的评分记录条数
    pub fn count_by_topic(&self, topic_id: &str) -> RepositoryResult<i32> {
        let conn = self.get_conn()?;

        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM evaluation WHERE topic_id = ?",
            params![topic_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

// ==========================================
// 辅助方法
// ==========================================

/// 将数据库行映射为 Evaluation 实体
fn map_row(row: &Row) -> SqliteResult<Evaluation> {
    let topic_id: String = row.get(0)?;
    let evaluator_id: String = row.get(1)?;
    let role_str: String = row.get(2)?;
    let student_id: String = row.get(3)?;
    let scores_json: String = row.get(4)?;
    let comments: Option<String> = row.get(5)?;
    let total_score: f64 = row.get(6)?;
    let has_all_scores: bool = row.get::<_, i32>(7)? != 0;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    // 解析角色码
    let role = EvaluatorRole::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("无效的评审角色码: {}", role_str).into(),
        )
    })?;

    // 解析评分 JSON
    let scores: BTreeMap<String, f64> = serde_json::from_str(&scores_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    // 解析时间戳
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e)))?;
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(Evaluation {
        topic_id,
        evaluator_id,
        role,
        student_id,
        scores,
        comments,
        total_score,
        has_all_scores,
        created_at,
        updated_at,
    })
}
