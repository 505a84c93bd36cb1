//! Reduction of per-image classifier output to a batch verdict.
//!
//! An image counts as infected when its result mentions `infect` or `disease`
//! in any letter case. A single infected image marks the whole batch
//! `Infected`; the percentage only reports how widespread it is.
//! Sentinel results (`Timeout`, `Error`, `No output`) match neither keyword
//! and therefore count as not infected.

use super::types::{HealthStatus, Verdict};

const INFECTION_KEYWORDS: [&str; 2] = ["infect", "disease"];

pub fn is_infected(result: &str) -> bool {
    let lowered = result.to_lowercase();
    INFECTION_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Aggregates results; an empty batch is `(Unknown, 0.0)`.
pub fn aggregate<S: AsRef<str>>(results: &[S]) -> Verdict {
    let total = results.len();
    if total == 0 {
        return Verdict::unknown();
    }

    let infected = results.iter().filter(|r| is_infected(r.as_ref())).count();
    let percentage = round2(100.0 * infected as f64 / total as f64);
    let status = if infected > 0 {
        HealthStatus::Infected
    } else {
        HealthStatus::Healthy
    };
    Verdict { status, percentage }
}

/// Two decimal places, exact halves going to the even neighbour.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceResult;

    #[test]
    fn empty_batch_is_unknown() {
        let empty: [&str; 0] = [];
        assert_eq!(aggregate(&empty), Verdict { status: HealthStatus::Unknown, percentage: 0.0 });
    }

    #[test]
    fn unrelated_label_is_healthy() {
        assert_eq!(aggregate(&["x"]), Verdict { status: HealthStatus::Healthy, percentage: 0.0 });
    }

    #[test]
    fn diseased_single_image() {
        assert_eq!(
            aggregate(&["leaf is diseased"]),
            Verdict { status: HealthStatus::Infected, percentage: 100.0 }
        );
    }

    #[test]
    fn one_in_three_rounds_to_two_places() {
        assert_eq!(
            aggregate(&["ok", "infected", "ok"]),
            Verdict { status: HealthStatus::Infected, percentage: 33.33 }
        );
        assert_eq!(aggregate(&["Disease", "INFECTION", "ok"]).percentage, 66.67);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let batch = |infected: usize| {
            let mut results = vec!["ok"; 32 - infected];
            results.extend(std::iter::repeat("infected").take(infected));
            aggregate(&results).percentage
        };

        // n/32 is exact in binary, so these are true ties at the third decimal.
        assert_eq!(batch(1), 3.12);
        assert_eq!(batch(3), 9.38);
        assert_eq!(batch(5), 15.62);
        assert_eq!(batch(7), 21.88);
        assert_eq!(batch(16), 50.0);
    }

    #[test]
    fn any_positive_flips_the_batch() {
        let mut results = vec!["healthy"; 99];
        results.push("Early blight disease");

        let verdict = aggregate(&results);
        assert_eq!(verdict.status, HealthStatus::Infected);
        assert_eq!(verdict.percentage, 1.0);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(is_infected("INFECTED"));
        assert!(is_infected("Tomato___Bacterial_DiSeAsE"));
        assert!(!is_infected("Tomato___healthy"));
    }

    #[test]
    fn sentinels_count_as_not_infected() {
        let results = vec![
            InferenceResult::Timeout,
            InferenceResult::Error,
            InferenceResult::NoOutput,
        ];

        assert_eq!(aggregate(&results), Verdict { status: HealthStatus::Healthy, percentage: 0.0 });
    }
}
