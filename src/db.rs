// ==========================================
// 毕业论文答辩评分系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 内置 schema 初始化，保证测试库与生产库建表一致
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
/// - 旧版评语正文的迁移由维护入口显式触发（见 main.rs），不属于 schema 迁移。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 所有表使用 CREATE TABLE IF NOT EXISTS，可在空库或已建库上重复执行。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        -- 课题分配关系（外部系统落库的既定事实，本核心只读 + 同步写入）
        CREATE TABLE IF NOT EXISTS topic_assignment (
            topic_id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL,
            supervisor_id TEXT NOT NULL,
            reviewer_id TEXT NOT NULL,
            defense_date TEXT,
            defense_time TEXT,
            location TEXT
        );

        -- 答辩委员会成员（主席/秘书/委员）
        CREATE TABLE IF NOT EXISTS defense_committee (
            committee_id TEXT NOT NULL,
            topic_id TEXT NOT NULL,
            lecturer_id TEXT NOT NULL,
            member_role TEXT NOT NULL,
            PRIMARY KEY (topic_id, lecturer_id)
        );

        -- 评分记录，键: (topic_id, evaluator_id, eval_role)，重复提交走 upsert
        CREATE TABLE IF NOT EXISTS evaluation (
            topic_id TEXT NOT NULL,
            evaluator_id TEXT NOT NULL,
            eval_role TEXT NOT NULL,
            student_id TEXT NOT NULL,
            scores_json TEXT NOT NULL,
            comments TEXT,
            total_score REAL NOT NULL,
            has_all_scores INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (topic_id, evaluator_id, eval_role)
        );

        -- 评语文档，每 (topic_id, doc_role) 仅一份，覆盖写
        CREATE TABLE IF NOT EXISTS summary_document (
            topic_id TEXT NOT NULL,
            doc_role TEXT NOT NULL,
            author_id TEXT NOT NULL,
            payload_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (topic_id, doc_role)
        );

        -- 答辩问答记录，只追加问题；回答由秘书更新
        CREATE TABLE IF NOT EXISTS qna_entry (
            qna_id TEXT PRIMARY KEY,
            topic_id TEXT NOT NULL,
            student_id TEXT NOT NULL,
            questioner_id TEXT NOT NULL,
            secretary_id TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT,
            question_time TEXT NOT NULL,
            answer_time TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_evaluation_evaluator ON evaluation(evaluator_id);
        CREATE INDEX IF NOT EXISTS idx_committee_lecturer ON defense_committee(lecturer_id);
        CREATE INDEX IF NOT EXISTS idx_qna_topic ON qna_entry(topic_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
