use crate::domain::evaluation::Evaluation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TIMESTAMP_FORMAT;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// EvaluationRepository - 评分记录仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 评分校验在引擎层完成后才会走到这里
pub struct EvaluationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EvaluationRepository {
    /// 创建新的评分记录仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入或覆盖评分记录 (last write wins)
    ///
    /// 单条 upsert 语句,原子生效:
    /// - 首次提交插入整行
    /// - 重复提交覆盖分数/评语并刷新 updated_at,保留 created_at
    ///
    /// # 参数
    /// - `evaluation`: 评分记录实体
    pub fn upsert(&self, evaluation: &Evaluation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let scores_json = serde_json::to_string(&evaluation.scores)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "scores".to_string(),
                message: e.to_string(),
            })?;

        conn.execute(
            r#"
            INSERT INTO evaluation (
                topic_id, evaluator_id, eval_role, student_id,
                scores_json, comments, total_score, has_all_scores,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(topic_id, evaluator_id, eval_role) DO UPDATE SET
                student_id = excluded.student_id,
                scores_json = excluded.scores_json,
                comments = excluded.comments,
                total_score = excluded.total_score,
                has_all_scores = excluded.has_all_scores,
                updated_at = excluded.updated_at
            "#,
            params![
                evaluation.topic_id,
                evaluation.evaluator_id,
                evaluation.role.as_str(),
                evaluation.student_id,
                scores_json,
                evaluation.comments,
                evaluation.total_score,
                evaluation.has_all_scores as i32,
                evaluation.created_at.format(TIMESTAMP_FORMAT).to_string(),
                evaluation.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }
}
