// ==========================================
// SummaryApi 集成测试
// ==========================================
// 测试范围:
// 1. 三类评语的写入/读取往返
// 2. 单一写入者权限 (指导/评阅/主席)
// 3. 旧版纯文本兜底读取
// ==========================================


use rusqlite::params;
use test_helpers::ApiTestEnv;
use thesis_grading::api::ApiError;
use thesis_grading::domain::summary::{
    CommitteeSummaryContent, ReviewerSummaryContent, SummaryContent, SupervisorSummaryContent,
};

/// 直接以旧系统格式落一行纯文本正文
fn insert_legacy_row(env: &ApiTestEnv, topic_id: &str, doc_role: &str, raw: &str) {
    let conn = env.conn.lock().unwrap();
    conn.execute(
        r#"
        INSERT INTO summary_document (topic_id, doc_role, author_id, payload_json, updated_at)
        VALUES (?1, ?2, 'legacy', ?3, '2024-06-01 08:00:00')
        "#,
        params![topic_id, doc_role, raw],
    )
    .unwrap();
}

// ==========================================
// 往返测试
// ==========================================

#[test]
fn test_supervisor_summary_往返() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let payload = SupervisorSummaryContent {
        attitude_effort: "全程投入,按计划推进".to_string(),
        content_quality: "系统功能完整,代码质量良好".to_string(),
        pros_cons: "优点: 工程化好;不足: 文献综述较薄".to_string(),
        conclusion_approve: Some(true),
        conclusion_note: "同意参加答辩".to_string(),
    };

    env.summary_api
        .upsert_supervisor_summary("T001", "GV01", payload.clone())
        .expect("写入失败");

    let doc = env
        .summary_api
        .get_supervisor_summary("T001")
        .unwrap()
        .expect("应能读到评语");

    assert_eq!(doc.author_id, "GV01");
    assert!(!doc.legacy_fallback);
    assert_eq!(doc.content, SummaryContent::Supervisor(payload));
}

#[test]
fn test_reviewer_summary_往返_字段齐全() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let payload = ReviewerSummaryContent {
        topic_necessity: "选题有现实需求".to_string(),
        subject_scope_fit: "与专业方向一致".to_string(),
        approach_validity: "技术路线合理".to_string(),
        scientific_soundness: "论证严谨".to_string(),
        practical_value: "可落地".to_string(),
        layout_compliance: "排版符合规范".to_string(),
        content_completeness: "章节完整".to_string(),
        methodology: "方法选择得当".to_string(),
        results: "实验结果可信".to_string(),
        pros: "实现完整".to_string(),
        cons: "对比实验偏少".to_string(),
        attitude: "修改响应及时".to_string(),
        additional_remarks: "建议补充消融实验".to_string(),
        conclusion_approve: Some(true),
        conclusion_note: "同意答辩".to_string(),
    };

    env.summary_api
        .upsert_reviewer_summary("T001", "GV02", payload.clone())
        .expect("写入失败");

    let doc = env.summary_api.get_reviewer_summary("T001").unwrap().unwrap();
    // 每个结构化字段精确往返
    assert_eq!(doc.content, SummaryContent::Reviewer(payload));
}

#[test]
fn test_council_summary_往返与覆盖() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let first = CommitteeSummaryContent {
        presentation: "陈述清楚".to_string(),
        ..Default::default()
    };
    env.summary_api
        .upsert_council_summary("T001", "GV05", first)
        .expect("写入失败");

    let second = CommitteeSummaryContent {
        presentation: "陈述清楚,时间控制得当".to_string(),
        answers: "回答基本准确".to_string(),
        content: "工作量饱满".to_string(),
        format: "文本规范".to_string(),
        overall: "达到毕业设计要求".to_string(),
        conclusion_note: "通过答辩".to_string(),
    };
    env.summary_api
        .upsert_council_summary("T001", "GV05", second.clone())
        .expect("覆盖写失败");

    let doc = env.summary_api.get_council_summary("T001").unwrap().unwrap();
    assert_eq!(doc.content, SummaryContent::Committee(second));

    // 覆盖写后仍只有一行
    let count: i32 = env
        .conn
        .lock()
        .unwrap()
        .query_row(
            "SELECT COUNT(*) FROM summary_document WHERE topic_id = 'T001'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_get_missing_summary_returns_none() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    assert!(env.summary_api.get_supervisor_summary("T001").unwrap().is_none());
    assert!(env.summary_api.get_reviewer_summary("T404").unwrap().is_none());
}

// ==========================================
// 权限测试
// ==========================================

#[test]
fn test_council_summary_只有主席可写() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    // 秘书 / 委员 / 指导教师 / 无关人员一律拒绝
    for author in ["GV09", "GV07", "GV01", "GV99"] {
        let result = env.summary_api.upsert_council_summary(
            "T001",
            author,
            CommitteeSummaryContent::default(),
        );
        assert!(
            matches!(result, Err(ApiError::NoAccess(_))),
            "{} 不应有委员会评语写权限",
            author
        );
    }

    // 拒绝的写入不落库
    assert!(env.summary_api.get_council_summary("T001").unwrap().is_none());

    // 主席放行
    env.summary_api
        .upsert_council_summary("T001", "GV05", CommitteeSummaryContent::default())
        .expect("主席写入应放行");
}

#[test]
fn test_supervisor_reviewer_summary_权限互不越界() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let result = env.summary_api.upsert_supervisor_summary(
        "T001",
        "GV02",
        SupervisorSummaryContent::default(),
    );
    assert!(matches!(result, Err(ApiError::NoAccess(_))));

    let result = env.summary_api.upsert_reviewer_summary(
        "T001",
        "GV01",
        ReviewerSummaryContent::default(),
    );
    assert!(matches!(result, Err(ApiError::NoAccess(_))));
}

// ==========================================
// 旧版兜底测试
// ==========================================

#[test]
fn test_legacy_blob_读取不抛错_原文落入兜底字段() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let raw = "论文选题合理，工作量达标；建议在第三章补充对比实验，修改后同意答辩。";
    insert_legacy_row(&env, "T001", "REVIEWER", raw);

    let doc = env
        .summary_api
        .get_reviewer_summary("T001")
        .expect("旧版正文读取不应报错")
        .expect("应能读到兜底文档");

    assert!(doc.legacy_fallback);
    match doc.content {
        SummaryContent::Reviewer(c) => {
            assert_eq!(c.additional_remarks, raw, "原文必须逐字保留");
            assert_eq!(c.pros, "");
        }
        other => panic!("兜底角色错误: {:?}", other),
    }
}
