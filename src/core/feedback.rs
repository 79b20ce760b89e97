//! Feedback messages for completed quizzes.
//!
//! Pure string building, used by the results screen and nothing else.

/// One of four fixed encouragement messages, bucketed by percentage:
/// 80+ / 60+ / 40+ / below.
pub fn feedback_message(score: usize, total: usize, topic: &str) -> String {
    let percentage = percentage(score, total);
    if percentage >= 80 {
        format!("Excellent! You scored {score}/{total} ({percentage}%) on {topic}. Outstanding knowledge!")
    } else if percentage >= 60 {
        format!("Good job! You scored {score}/{total} ({percentage}%) on {topic}. Keep it up!")
    } else if percentage >= 40 {
        format!("Keep learning! You scored {score}/{total} ({percentage}%) on {topic}. Practice more!")
    } else {
        format!("Don't give up! You scored {score}/{total} ({percentage}%) on {topic}. Try again!")
    }
}

/// Integer percentage, rounded to nearest. Zero total scores zero rather
/// than dividing by it.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(4, 5), 80);
        assert_eq!(percentage(3, 5), 60);
        assert_eq!(percentage(2, 5), 40);
        assert_eq!(percentage(1, 5), 20);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn test_feedback_buckets() {
        assert_eq!(
            feedback_message(5, 5, "Rust"),
            "Excellent! You scored 5/5 (100%) on Rust. Outstanding knowledge!"
        );
        assert_eq!(
            feedback_message(4, 5, "Rust"),
            "Excellent! You scored 4/5 (80%) on Rust. Outstanding knowledge!"
        );
        assert_eq!(
            feedback_message(3, 5, "Rust"),
            "Good job! You scored 3/5 (60%) on Rust. Keep it up!"
        );
        assert_eq!(
            feedback_message(2, 5, "Rust"),
            "Keep learning! You scored 2/5 (40%) on Rust. Practice more!"
        );
        assert_eq!(
            feedback_message(1, 5, "Rust"),
            "Don't give up! You scored 1/5 (20%) on Rust. Try again!"
        );
        assert_eq!(
            feedback_message(0, 5, "Rust"),
            "Don't give up! You scored 0/5 (0%) on Rust. Try again!"
        );
    }

    #[test]
    fn test_feedback_boundaries_sit_in_upper_bucket() {
        // Exactly 80, 60 and 40 percent belong to the higher tier.
        assert!(feedback_message(4, 5, "t").starts_with("Excellent!"));
        assert!(feedback_message(3, 5, "t").starts_with("Good job!"));
        assert!(feedback_message(2, 5, "t").starts_with("Keep learning!"));
    }
}
