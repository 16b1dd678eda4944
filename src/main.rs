// ==========================================
// 毕业论文答辩评分系统 - 维护入口
// ==========================================
// 职责: 初始化数据库 schema + 一次性迁移旧版评语正文
// 说明: 业务操作全部经由 API 层供外部 UI 调用,本入口只做维护
// ==========================================

use std::sync::{Arc, Mutex};

use thesis_grading::config::ConfigManager;
use thesis_grading::repository::SummaryRepository;
use thesis_grading::{db, i18n, logging};

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("毕业论文答辩评分系统 - 维护入口");
    tracing::info!("系统版本: {}", thesis_grading::VERSION);
    tracing::info!("==================================================");

    // 数据库路径: 命令行第一个参数,缺省 thesis_grading.db
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "thesis_grading.db".to_string());
    tracing::info!("使用数据库: {}", db_path);

    let conn = db::open_sqlite_connection(&db_path)?;

    // schema 版本检查 + 初始化 (幂等)
    match db::read_schema_version(&conn)? {
        Some(version) if version > db::CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                "数据库 schema_version={} 高于当前代码期望的 {},请确认程序版本",
                version,
                db::CURRENT_SCHEMA_VERSION
            );
        }
        Some(version) => {
            tracing::info!("数据库 schema_version={}", version);
        }
        None => {
            tracing::info!("空库,执行 schema 初始化");
        }
    }
    db::init_schema(&conn)?;

    let conn = Arc::new(Mutex::new(conn));

    // 语言配置
    let config = ConfigManager::from_connection(conn.clone())?;
    let locale = config.get_locale()?;
    i18n::set_locale(&locale);
    tracing::info!("语言: {}", locale);

    // 一次性迁移旧版评语正文 (幂等,已结构化的行不动)
    let summary_repo = SummaryRepository::new(conn);
    let promoted = summary_repo.promote_legacy(None)?;
    tracing::info!(
        "{}",
        i18n::t_with_args("summary.legacy_promoted", &[("count", &promoted.to_string())])
    );

    tracing::info!("{}", i18n::t("common.success"));
    Ok(())
}
