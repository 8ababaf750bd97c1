/// Per-item difficulty metrics derived from recorded answers, used to bias
/// item selection toward what the learner keeps getting wrong.
#[derive(Debug, Clone)]
pub struct ItemDifficulty {
    pub miss_rate: f64,      // Percentage of wrong answers (0-100)
    pub avg_answer_ms: f64,  // Average time to answer
    pub attempts: i64,       // Total recorded answers for weighting
}
