// ==========================================
// 毕业论文答辩评分系统 - 答辩问答数据仓储
// ==========================================
// 对齐: qna_entry 表
// 红线: 问题只追加;回答更新为单语句原子操作
// ==========================================

use crate::domain::qna::QnaEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TIMESTAMP_FORMAT;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// qna_entry 表统一列清单
const QNA_COLUMNS: &str = r#"qna_id, topic_id, student_id, questioner_id, secretary_id,
       question, answer, question_time, answer_time"#;

// ==========================================
// QnaRepository - 答辩问答仓储
// ==========================================
pub struct QnaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QnaRepository {
    /// 创建新的答辩问答仓储
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

    /// 追加一条问题记录
    pub fn insert(&self, entry: &QnaEntry) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            &format!(
                r#"
                INSERT INTO qna_entry ({QNA_COLUMNS})
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            ),
            params![
                entry.qna_id,
                entry.topic_id,
                entry.student_id,
                entry.questioner_id,
                entry.secretary_id,
                entry.question,
                entry.answer,
                entry.question_time.format(TIMESTAMP_FORMAT).to_string(),
                entry
                    .answer_time
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            ],
        )?;

        Ok(entry.qna_id.clone())
    }

    /// 更新回答并刷新回答时间
    ///
    /// 已有回答会被覆盖 (更正流程)。
    ///
    /// # 返回
    /// - Ok(entry): 更新后的记录
    /// - Err(NotFound): qna_id 不存在
    pub fn update_answer(&self, qna_id: &str, answer: &str) -> RepositoryResult<QnaEntry> {
        let now = Utc::now().naive_utc();
        {
            let conn = self.get_conn()?;
            let rows = conn.execute(
                "UPDATE qna_entry SET answer = ?1, answer_time = ?2 WHERE qna_id = ?3",
                params![answer, now.format(TIMESTAMP_FORMAT).to_string(), qna_id],
            )?;

            if rows == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "QnaEntry".to_string(),
                    id: qna_id.to_string(),
                });
            }
        }

        self.find_by_id(qna_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "QnaEntry".to_string(),
            id: qna_id.to_string(),
        })
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 qna_id 查询单条记录
    pub fn find_by_id(&self, qna_id: &str) -> RepositoryResult<Option<QnaEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {QNA_COLUMNS}
            FROM qna_entry
            WHERE qna_id = ?
            "#,
        ))?;

        match stmt.query_row(params![qna_id], map_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询课题的全部问答记录,按提问时间升序
    ///
    /// 同秒提问以 rowid 兜底,保证顺序确定。
    pub fn list_by_topic(&self, topic_id: &str) -> RepositoryResult<Vec<QnaEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {QNA_COLUMNS}
            FROM qna_entry
            WHERE topic_id = ?
            ORDER BY question_time ASC, rowid ASC
            "#,
        ))?;

        let entries = stmt
            .query_map(params![topic_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }
}

// ==========================================
// 辅助方法
// ==========================================

/// 将数据库行映射为 QnaEntry 实体
fn map_row(row: &Row) -> SqliteResult<QnaEntry> {
    let question_time_str: String = row.get(7)?;
    let answer_time_str: Option<String> = row.get(8)?;

    let question_time = NaiveDateTime::parse_from_str(&question_time_str, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e)))?;
    let answer_time = answer_time_str
        .and_then(|s| NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).ok());

    Ok(QnaEntry {
        qna_id: row.get(0)?,
        topic_id: row.get(1)?,
        student_id: row.get(2)?,
        questioner_id: row.get(3)?,
        secretary_id: row.get(4)?,
        question: row.get(5)?,
        answer: row.get(6)?,
        question_time,
        answer_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use uuid::Uuid;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn make_test_entry(topic_id: &str, question: &str) -> QnaEntry {
        QnaEntry {
            qna_id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            student_id: "SV001".to_string(),
            questioner_id: "GV05".to_string(),
            secretary_id: "GV09".to_string(),
            question: question.to_string(),
            answer: None,
            question_time: Utc::now().naive_utc().with_nanosecond(0).unwrap(),
            answer_time: None,
        }
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let conn = setup_test_db();
        let repo = QnaRepository::new(conn);

        let entry = make_test_entry("T001", "数据集划分依据是什么?");
        let id = repo.insert(&entry).unwrap();

        let found = repo.find_by_id(&id).unwrap().expect("应能查到刚写入的记录");
        assert_eq!(found.question, "数据集划分依据是什么?");
        assert_eq!(found.answer, None);
        assert!(!found.is_answered());
    }

    #[test]
    fn test_list_by_topic_按提问顺序() {
        let conn = setup_test_db();
        let repo = QnaRepository::new(conn);

        // 同一秒内追加多条,顺序仍须稳定
        repo.insert(&make_test_entry("T001", "问题一")).unwrap();
        repo.insert(&make_test_entry("T001", "问题二")).unwrap();
        repo.insert(&make_test_entry("T001", "问题三")).unwrap();
        repo.insert(&make_test_entry("T002", "无关问题")).unwrap();

        let entries = repo.list_by_topic("T001").unwrap();
        let questions: Vec<&str> = entries.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["问题一", "问题二", "问题三"]);
    }

    #[test]
    fn test_update_answer_及覆盖() {
        let conn = setup_test_db();
        let repo = QnaRepository::new(conn);

        let entry = make_test_entry("T001", "模型为何选用 LSTM?");
        let id = repo.insert(&entry).unwrap();

        let updated = repo.update_answer(&id, "序列数据上表现更稳").unwrap();
        assert_eq!(updated.answer.as_deref(), Some("序列数据上表现更稳"));
        assert!(updated.answer_time.is_some());
        assert!(updated.is_answered());

        // 允许覆盖已有回答 (更正流程)
        let corrected = repo.update_answer(&id, "补充: 并做了消融对比").unwrap();
        assert_eq!(corrected.answer.as_deref(), Some("补充: 并做了消融对比"));
    }

    #[test]
    fn test_update_answer_不存在的记录() {
        let conn = setup_test_db();
        let repo = QnaRepository::new(conn);

        let result = repo.update_answer("no-such-id", "answer");
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }
}
