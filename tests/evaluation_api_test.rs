// ==========================================
// EvaluationApi 集成测试
// ==========================================
// 测试范围:
// 1. 评分提交: 细则校验、权限、upsert 不产生重复行
// 2. 最终成绩: 加权合成 (1:2:1)/4、状态派生
// 3. 评审任务列表: 状态改写与范围筛选
// ==========================================


use std::collections::BTreeMap;

use chrono::{Duration, Local};
use test_helpers::ApiTestEnv;
use thesis_grading::api::{ApiError, SubmitEvaluationRequest};
use thesis_grading::domain::types::{EvaluationStatus, EvaluatorRole, TaskScope};

// ==========================================
// 评分数据构造 (全部用二进制可精确表示的分值)
// ==========================================

fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

/// 指导教师满表, 总分 8.0
fn supervisor_scores_total_8() -> BTreeMap<String, f64> {
    scores(&[
        ("student_attitude", 1.0),
        ("problem_solving", 0.75),
        ("format", 1.25),
        ("content_implementation", 3.5),
        ("related_issues", 0.75),
        ("practical_application", 0.75),
    ])
}

/// 评阅教师满表, 总分 7.0
fn reviewer_scores_total_7() -> BTreeMap<String, f64> {
    scores(&[
        ("format", 1.25),
        ("content_quality", 3.0),
        ("related_issues", 1.5),
        ("practical_application", 1.0),
        ("bonus", 0.25),
    ])
}

/// 答辩委员会满表, 总分 9.0
fn committee_scores_total_9() -> BTreeMap<String, f64> {
    scores(&[
        ("presentation_clarity", 0.5),
        ("reviewer_qa", 1.25),
        ("committee_qa", 1.25),
        ("attitude", 1.0),
        ("content_implementation", 4.25),
        ("related_issues", 0.75),
    ])
}

fn submit(
    env: &ApiTestEnv,
    topic_id: &str,
    evaluator_id: &str,
    role: EvaluatorRole,
    score_map: BTreeMap<String, f64>,
) {
    env.evaluation_api
        .submit_evaluation(SubmitEvaluationRequest {
            topic_id: topic_id.to_string(),
            student_id: "SV001".to_string(),
            evaluator_id: evaluator_id.to_string(),
            evaluation_type: role,
            comments: None,
            scores: score_map,
        })
        .expect("提交失败");
}

// ==========================================
// 评分提交测试
// ==========================================

#[test]
fn test_submit_evaluation_落库并派生字段() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let stored = env
        .evaluation_api
        .submit_evaluation(SubmitEvaluationRequest {
            topic_id: "T001".to_string(),
            student_id: "SV001".to_string(),
            evaluator_id: "GV01".to_string(),
            evaluation_type: EvaluatorRole::Supervisor,
            comments: Some("实现完整度较好".to_string()),
            scores: scores(&[("format", 1.25), ("student_attitude", 1.0)]),
        })
        .expect("提交失败");

    assert_eq!(stored.total_score, 2.25);
    // 六项只填了两项
    assert!(!stored.has_all_scores);
    assert_eq!(stored.comments.as_deref(), Some("实现完整度较好"));

    let list = env.evaluation_api.get_evaluations_by_topic("T001").unwrap();
    assert_eq!(list.len(), 1);
}

#[test]
fn test_submit_未知评分项_拒绝且不落库() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let result = env.evaluation_api.submit_evaluation(SubmitEvaluationRequest {
        topic_id: "T001".to_string(),
        student_id: "SV001".to_string(),
        evaluator_id: "GV02".to_string(),
        evaluation_type: EvaluatorRole::Reviewer,
        comments: None,
        // student_attitude 属于指导教师细则,评阅细则没有
        scores: scores(&[("student_attitude", 1.0)]),
    });

    assert!(matches!(result, Err(ApiError::UnknownCriterion { .. })));
    assert!(env
        .evaluation_api
        .get_evaluations_by_topic("T001")
        .unwrap()
        .is_empty());
}

#[test]
fn test_submit_分值越界_拒绝且不落库() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    let result = env.evaluation_api.submit_evaluation(SubmitEvaluationRequest {
        topic_id: "T001".to_string(),
        student_id: "SV001".to_string(),
        evaluator_id: "GV02".to_string(),
        evaluation_type: EvaluatorRole::Reviewer,
        comments: None,
        scores: scores(&[("bonus", 0.75)]), // bonus 满分 0.5
    });

    assert!(matches!(result, Err(ApiError::ScoreOutOfRange { .. })));
    assert!(env
        .evaluation_api
        .get_evaluations_by_topic("T001")
        .unwrap()
        .is_empty());
}

#[test]
fn test_submit_非指派评审人_无权限() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    // GV02 是评阅教师,不是指导教师
    let result = env.evaluation_api.submit_evaluation(SubmitEvaluationRequest {
        topic_id: "T001".to_string(),
        student_id: "SV001".to_string(),
        evaluator_id: "GV02".to_string(),
        evaluation_type: EvaluatorRole::Supervisor,
        comments: None,
        scores: supervisor_scores_total_8(),
    });

    assert!(matches!(result, Err(ApiError::NoAccess(_))));
    assert!(env
        .evaluation_api
        .get_evaluations_by_topic("T001")
        .unwrap()
        .is_empty());
}

#[test]
fn test_重复提交_覆盖不产生重复行() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    submit(&env, "T001", "GV02", EvaluatorRole::Reviewer, scores(&[("format", 1.0)]));
    submit(&env, "T001", "GV02", EvaluatorRole::Reviewer, reviewer_scores_total_7());

    let list = env.evaluation_api.get_evaluations_by_topic("T001").unwrap();
    assert_eq!(list.len(), 1, "同键重复提交不得产生第二行");
    assert_eq!(list[0].total_score, 7.0);
    assert!(list[0].has_all_scores);
}

// ==========================================
// 最终成绩测试
// ==========================================

#[test]
fn test_final_score_三方齐备_加权总评() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    submit(&env, "T001", "GV01", EvaluatorRole::Supervisor, supervisor_scores_total_8());
    submit(&env, "T001", "GV02", EvaluatorRole::Reviewer, reviewer_scores_total_7());
    submit(&env, "T001", "GV05", EvaluatorRole::Committee, committee_scores_total_9());

    let final_score = env.evaluation_api.get_final_score("T001").unwrap();

    assert_eq!(final_score.supervisor_score, Some(8.0));
    assert_eq!(final_score.reviewer_score, Some(7.0));
    assert_eq!(final_score.committee_score, Some(9.0));
    // (8*1 + 7*2 + 9*1) / 4 = 7.75
    assert_eq!(final_score.final_score, Some(7.75));
    assert_eq!(final_score.status, EvaluationStatus::Completed);
}

#[test]
fn test_final_score_缺委员会_状态Pending() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    submit(&env, "T001", "GV01", EvaluatorRole::Supervisor, supervisor_scores_total_8());
    submit(&env, "T001", "GV02", EvaluatorRole::Reviewer, reviewer_scores_total_7());

    let final_score = env.evaluation_api.get_final_score("T001").unwrap();

    assert_eq!(final_score.final_score, None);
    assert_eq!(final_score.committee_score, None);
    // 已有记录均完整,只是委员会未评 → 等待
    assert_eq!(final_score.status, EvaluationStatus::Pending);
}

#[test]
fn test_final_score_评阅漏填一项_状态Incomplete() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    submit(&env, "T001", "GV01", EvaluatorRole::Supervisor, supervisor_scores_total_8());
    submit(&env, "T001", "GV05", EvaluatorRole::Committee, committee_scores_total_9());

    // 评阅教师漏填 bonus
    let mut partial = reviewer_scores_total_7();
    partial.remove("bonus");
    submit(&env, "T001", "GV02", EvaluatorRole::Reviewer, partial);

    let final_score = env.evaluation_api.get_final_score("T001").unwrap();

    assert_eq!(final_score.reviewer_score, None);
    assert_eq!(final_score.final_score, None);
    assert_eq!(final_score.status, EvaluationStatus::Incomplete);
}

#[test]
fn test_final_score_只读幂等() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);
    submit(&env, "T001", "GV01", EvaluatorRole::Supervisor, supervisor_scores_total_8());

    let first = env.evaluation_api.get_final_score("T001").unwrap();
    let second = env.evaluation_api.get_final_score("T001").unwrap();
    assert_eq!(first, second);
}

// ==========================================
// 评审任务列表测试
// ==========================================

#[test]
fn test_evaluator_tasks_状态与范围筛选() {
    let env = ApiTestEnv::new();
    let today = Local::now().date_naive();
    let yesterday = today - Duration::days(1);
    let next_week = today + Duration::days(7);

    // GV01 名下三个课题: 已评完 / 未评且已过期 / 未评且未到期
    env.seed_assignment("T001", "SV001", "GV01", "GV02", Some(next_week));
    env.seed_assignment("T002", "SV002", "GV01", "GV03", Some(yesterday));
    env.seed_assignment("T003", "SV003", "GV01", "GV04", Some(next_week));
    submit(&env, "T001", "GV01", EvaluatorRole::Supervisor, supervisor_scores_total_8());

    let all = env
        .evaluation_api
        .get_evaluator_tasks("GV01", None, TaskScope::All)
        .unwrap();
    assert_eq!(all.len(), 3);

    let by_topic: std::collections::HashMap<&str, EvaluationStatus> = all
        .iter()
        .map(|t| (t.topic_id.as_str(), t.evaluation_status))
        .collect();
    assert_eq!(by_topic["T001"], EvaluationStatus::Completed);
    // 答辩日期已过且无记录 → 不再预期评分
    assert_eq!(by_topic["T002"], EvaluationStatus::NoScore);
    assert_eq!(by_topic["T003"], EvaluationStatus::Pending);

    // 范围筛选
    let pending = env
        .evaluation_api
        .get_evaluator_tasks("GV01", None, TaskScope::Pending)
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|t| t.evaluation_status != EvaluationStatus::Completed));

    let completed = env
        .evaluation_api
        .get_evaluator_tasks("GV01", None, TaskScope::Completed)
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].topic_id, "T001");

    // 日期筛选
    let on_date = env
        .evaluation_api
        .get_evaluator_tasks("GV01", Some(yesterday), TaskScope::All)
        .unwrap();
    assert_eq!(on_date.len(), 1);
    assert_eq!(on_date[0].topic_id, "T002");
}

#[test]
fn test_evaluator_tasks_委员会线() {
    let env = ApiTestEnv::new();
    env.seed_standard_topic("T001", None);

    // 委员 GV07 名下只有委员会任务
    let tasks = env
        .evaluation_api
        .get_evaluator_tasks("GV07", None, TaskScope::All)
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].evaluation_type, EvaluatorRole::Committee);
    assert_eq!(tasks[0].evaluation_status, EvaluationStatus::Pending);
}
