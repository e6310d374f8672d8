//! Fuzzy person matching for the search rule.

use strsim::normalized_levenshtein;

use crate::domain::{Employee, fold_text};

/// Minimum similarity for identifier and name matches.
pub const NAME_THRESHOLD: f64 = 0.6;
/// Minimum similarity for job-title matches.
pub const TITLE_THRESHOLD: f64 = 0.7;

/// Similarity between a folded `query` and `employee`, or `None` when no
/// field clears its threshold.
///
/// An exact identifier or full-name match scores `1.0`.
pub fn match_score(query: &str, employee: &Employee) -> Option<f64> {
    let id = fold_text(employee.id().as_str());
    let full_name = fold_text(&employee.full_name());
    if query == id || query == full_name {
        return Some(1.0);
    }

    let name_score = [
        id,
        full_name,
        fold_text(employee.first_name()),
        fold_text(employee.last_name()),
    ]
    .iter()
    .filter(|field| !field.is_empty())
    .map(|field| normalized_levenshtein(query, field))
    .fold(0.0_f64, f64::max);

    let title = fold_text(employee.job_title());
    let title_score = if title.is_empty() {
        0.0
    } else {
        normalized_levenshtein(query, &title)
    };

    let qualifying = [
        (name_score >= NAME_THRESHOLD).then_some(name_score),
        (title_score >= TITLE_THRESHOLD).then_some(title_score),
    ];
    qualifying.into_iter().flatten().reduce(f64::max)
}

/// Best-scoring employee for `query`. Ties keep the earliest candidate.
pub fn best_match<'a>(query: &str, candidates: &'a [Employee]) -> Option<(&'a Employee, f64)> {
    let mut best: Option<(&Employee, f64)> = None;
    for candidate in candidates {
        let Some(score) = match_score(query, candidate) else {
            continue;
        };
        if best.is_none_or(|(_, current)| score > current) {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeDraft, EmployeeId};
    use rstest::{fixture, rstest};

    fn person(id: &str, first: &str, last: &str, title: &str) -> Employee {
        let mut draft = EmployeeDraft::new(EmployeeId::new(id).expect("id"), id.to_lowercase());
        draft.first_name = first.into();
        draft.last_name = last.into();
        draft.job_title = title.into();
        Employee::new(draft).expect("employee")
    }

    #[fixture]
    fn directory() -> Vec<Employee> {
        vec![
            person("EMP001", "Jean", "Dupont", "Développeur"),
            person("EMP002", "Jeanne", "Dupond", "Analyste"),
            person("EMP003", "Sophie", "Martin", "Directrice financière"),
        ]
    }

    #[rstest]
    #[case("emp002", "EMP002")]
    #[case("jean dupont", "EMP001")]
    #[case("jeanne dupond", "EMP002")]
    fn exact_matches_score_one(
        directory: Vec<Employee>,
        #[case] query: &str,
        #[case] expected: &str,
    ) {
        let (found, score) = best_match(query, &directory).expect("match");
        assert_eq!(found.id().as_str(), expected);
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn close_names_clear_the_threshold(directory: Vec<Employee>) {
        let (found, score) = best_match("martine", &directory).expect("match");
        assert_eq!(found.id().as_str(), "EMP003");
        assert!(score >= NAME_THRESHOLD);
    }

    #[rstest]
    fn titles_need_the_higher_threshold(directory: Vec<Employee>) {
        let (found, _) = best_match("directrice financiere", &directory).expect("title match");
        assert_eq!(found.id().as_str(), "EMP003");
        assert!(best_match("comptable", &directory).is_none());
    }

    #[rstest]
    fn ties_keep_directory_order() {
        let twins = vec![
            person("EMP010", "Alex", "Moreau", "Analyste"),
            person("EMP011", "Alex", "Moreau", "Analyste"),
        ];
        let (found, _) = best_match("alex moreau", &twins).expect("match");
        assert_eq!(found.id().as_str(), "EMP010");
    }
}
