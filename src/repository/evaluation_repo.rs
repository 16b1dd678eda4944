// ==========================================
// 毕业论文答辩评分系统 - 评分记录数据仓储
// ==========================================
// 对齐: evaluation 表
// 红线: 同一 (topic_id, evaluator_id, eval_role) 永远只有一行
// ==========================================

mod core;
mod queries;


pub use core::EvaluationRepository;
