//! Diagnosis extraction from a generated summary.
//!
//! The summarization prompt instructs the model to emit a single line of
//! the form `Diagnosis: <one or two words>`. The extractor scans for that
//! line and returns the remainder; no validation that the extracted value
//! is plausible.

/// Sentinel returned when the summary contains no diagnosis line.
pub const NO_DIAGNOSIS: &str = "No diagnosis found";

/// Stateless extractor for the diagnosis label in a summary.
pub struct DiagnosisExtractor;

impl DiagnosisExtractor {
    const PREFIX: &'static str = "diagnosis:";

    /// Scan a multi-line summary for the first line starting with
    /// `diagnosis:` (any case), strip the prefix and surrounding
    /// whitespace, and return the remainder. The prefix match and the
    /// strip are both case-insensitive, so `DIAGNOSIS: flu` yields `flu`.
    ///
    /// Returns [`NO_DIAGNOSIS`] when no line matches.
    pub fn extract(summary: &str) -> String {
        summary
            .lines()
            .find_map(|line| {
                line.get(..Self::PREFIX.len())
                    .filter(|head| head.eq_ignore_ascii_case(Self::PREFIX))
                    .map(|_| line[Self::PREFIX.len()..].trim().to_string())
            })
            .unwrap_or_else(|| NO_DIAGNOSIS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_prefixed_line() {
        assert_eq!(DiagnosisExtractor::extract("Diagnosis: flu\nmore text"), "flu");
    }

    #[test]
    fn returns_sentinel_when_absent() {
        assert_eq!(
            DiagnosisExtractor::extract("no relevant line"),
            NO_DIAGNOSIS
        );
        assert_eq!(DiagnosisExtractor::extract(""), NO_DIAGNOSIS);
    }

    #[test]
    fn strip_is_case_insensitive() {
        assert_eq!(DiagnosisExtractor::extract("DIAGNOSIS: flu"), "flu");
        assert_eq!(DiagnosisExtractor::extract("diagnosis:   migraine  "), "migraine");
    }

    #[test]
    fn first_matching_line_wins() {
        let summary = "Summary of the visit.\nDiagnosis: tension headache\nDiagnosis: other";
        assert_eq!(DiagnosisExtractor::extract(summary), "tension headache");
    }

    #[test]
    fn indented_diagnosis_line_does_not_match() {
        // The line must start with the prefix, matching the original
        // line-prefix contract.
        assert_eq!(
            DiagnosisExtractor::extract("  Diagnosis: flu"),
            NO_DIAGNOSIS
        );
    }

    #[test]
    fn empty_value_is_returned_as_is() {
        assert_eq!(DiagnosisExtractor::extract("Diagnosis:"), "");
    }
}
