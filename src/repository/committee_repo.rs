// ==========================================
// 毕业论文答辩评分系统 - 委员会/分配关系数据仓储
// ==========================================
// 对齐: defense_committee / topic_assignment 表
// 红线: 指派关系由外部系统产生,本仓储提供读取与同步写入,
//       不做任何指派推导
// ==========================================

use crate::domain::committee::{CommitteeMember, TopicAssignment};
use crate::domain::types::{CommitteeRole, EvaluatorRole};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::DATE_FORMAT;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// CommitteeRepository - 委员会/分配关系仓储
// ==========================================
pub struct CommitteeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CommitteeRepository {
    /// 创建新的委员会仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 同步写入 (外部指派数据落库)
    // ==========================================

    /// 写入/覆盖课题分配关系
    pub fn upsert_assignment(&self, assignment: &TopicAssignment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO topic_assignment (
                topic_id, student_id, supervisor_id, reviewer_id,
                defense_date, defense_time, location
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(topic_id) DO UPDATE SET
                student_id = excluded.student_id,
                supervisor_id = excluded.supervisor_id,
                reviewer_id = excluded.reviewer_id,
                defense_date = excluded.defense_date,
                defense_time = excluded.defense_time,
                location = excluded.location
            "#,
            params![
                assignment.topic_id,
                assignment.student_id,
                assignment.supervisor_id,
                assignment.reviewer_id,
                assignment
                    .defense_date
                    .map(|d| d.format(DATE_FORMAT).to_string()),
                assignment.defense_time,
                assignment.location,
            ],
        )?;

        Ok(())
    }

    /// 写入一名委员会成员
    pub fn insert_member(&self, member: &CommitteeMember) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO defense_committee (committee_id, topic_id, lecturer_id, member_role)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(topic_id, lecturer_id) DO UPDATE SET
                committee_id = excluded.committee_id,
                member_role = excluded.member_role
            "#,
            params![
                member.committee_id,
                member.topic_id,
                member.lecturer_id,
                member.role.as_str(),
            ],
        )?;

        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询课题分配关系
    pub fn get_assignment(&self, topic_id: &str) -> RepositoryResult<Option<TopicAssignment>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT topic_id, student_id, supervisor_id, reviewer_id,
                   defense_date, defense_time, location
            FROM topic_assignment
            WHERE topic_id = ?
            "#,
        )?;

        match stmt.query_row(params![topic_id], map_assignment_row) {
            Ok(assignment) => Ok(Some(assignment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询课题的委员会成员,顺序: 主席 → 秘书 → 委员,同角色按教师ID升序
    pub fn list_members(&self, topic_id: &str) -> RepositoryResult<Vec<CommitteeMember>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT committee_id, topic_id, lecturer_id, member_role
            FROM defense_committee
            WHERE topic_id = ?
            ORDER BY CASE member_role
                         WHEN 'CHAIRMAN' THEN 0
                         WHEN 'SECRETARY' THEN 1
                         ELSE 2
                     END,
                     lecturer_id ASC
            "#,
        )?;

        let members = stmt
            .query_map(params![topic_id], map_member_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(members)
    }

    /// 该教师是否为课题的委员会成员 (任意角色)
    pub fn is_member(&self, topic_id: &str, lecturer_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM defense_committee WHERE topic_id = ? AND lecturer_id = ?",
            params![topic_id, lecturer_id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// 查询该教师在课题委员会中的角色
    pub fn find_member_role(
        &self,
        topic_id: &str,
        lecturer_id: &str,
    ) -> RepositoryResult<Option<CommitteeRole>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT member_role FROM defense_committee WHERE topic_id = ? AND lecturer_id = ?",
            params![topic_id, lecturer_id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(code) => Ok(CommitteeRole::parse(&code)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询评审人名下的全部 (分配关系, 评审角色)
    ///
    /// 任务列表数据源: 指导 / 评阅 / 委员会三条线各出一行,
    /// 顺序: 课题ID升序,同课题内按角色顺序。
    pub fn list_assignments_for_evaluator(
        &self,
        evaluator_id: &str,
    ) -> RepositoryResult<Vec<(TopicAssignment, EvaluatorRole)>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT t.topic_id, t.student_id, t.supervisor_id, t.reviewer_id,
                   t.defense_date, t.defense_time, t.location,
                   r.eval_role
            FROM (
                SELECT topic_id, 'SUPERVISOR' AS eval_role
                FROM topic_assignment WHERE supervisor_id = ?1
                UNION ALL
                SELECT topic_id, 'REVIEWER'
                FROM topic_assignment WHERE reviewer_id = ?1
                UNION ALL
                SELECT topic_id, 'COMMITTEE'
                FROM defense_committee WHERE lecturer_id = ?1
            ) r
            JOIN topic_assignment t ON t.topic_id = r.topic_id
            ORDER BY t.topic_id ASC,
                     CASE r.eval_role
                         WHEN 'SUPERVISOR' THEN 0
                         WHEN 'REVIEWER' THEN 1
                         ELSE 2
                     END
            "#,
        )?;

        let rows = stmt
            .query_map(params![evaluator_id], |row| {
                let assignment = map_assignment_row(row)?;
                let role_str: String = row.get(7)?;
                Ok((assignment, role_str))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut result = Vec::with_capacity(rows.len());
        for (assignment, role_str) in rows {
            let role = EvaluatorRole::parse(&role_str).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "eval_role".to_string(),
                    message: format!("无效的评审角色码: {}", role_str),
                }
            })?;
            result.push((assignment, role));
        }

        Ok(result)
    }
}

// ==========================================
// 辅助方法
// ==========================================

/// 将数据库行映射为 TopicAssignment 实体 (前 7 列)
fn map_assignment_row(row: &Row) -> SqliteResult<TopicAssignment> {
    let defense_date_str: Option<String> = row.get(4)?;
    let defense_date =
        defense_date_str.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());

    Ok(TopicAssignment {
        topic_id: row.get(0)?,
        student_id: row.get(1)?,
        supervisor_id: row.get(2)?,
        reviewer_id: row.get(3)?,
        defense_date,
        defense_time: row.get(5)?,
        location: row.get(6)?,
    })
}

/// 将数据库行映射为 CommitteeMember 实体
fn map_member_row(row: &Row) -> SqliteResult<CommitteeMember> {
    let role_str: String = row.get(3)?;
    let role = CommitteeRole::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("无效的成员角色码: {}", role_str).into(),
        )
    })?;

    Ok(CommitteeMember {
        committee_id: row.get(0)?,
        topic_id: row.get(1)?,
        lecturer_id: row.get(2)?,
        role,
    })
}
