use rand::Rng;

/// Fisher-Yates shuffle returning a fresh vector, leaving the input untouched.
/// Takes the rng as a parameter so tests can inject a seeded one.
pub fn shuffled<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Percentage of correct answers, rounded to the nearest whole number.
/// An empty session (total == 0) counts as 0, not a division error.
pub fn calculate_accuracy(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}
