// Unit Tests for the Failure Category Taxonomy
//
// UNIT UNDER TEST: Category
//
// BUSINESS RESPONSIBILITY:
//   - Defines the closed set of outcome classes callers build retry policy on
//   - Carries the fixed backoff multiplier hint per category
//   - Provides a stable label used in logs and serialized records
//
// TEST COVERAGE:
//   - Backoff multipliers for fixed and caller-defined categories
//   - Retryability and severity mapping
//   - Label, Display, FromStr and serde agreement

use crate::core_types::{Category, ErrorSeverity};

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn test_fixed_backoff_multipliers() {
        // Access, throttling, disabled and not-found outcomes imply a longer backoff

        // Arrange
        let doubled = [
            Category::NoAccess,
            Category::Throttling,
            Category::ServiceDisabled,
            Category::ObjectNotFound,
        ];

        // Act & Assert
        for category in doubled {
            assert_eq!(category.backoff_multiplier(), Some(2), "{category}");
        }
        assert_eq!(Category::TemporaryError.backoff_multiplier(), Some(1));
    }

    #[test]
    fn test_caller_defined_multipliers_are_absent() {
        // Network and unknown outcomes leave the multiplier to the caller

        assert_eq!(Category::NetworkError.backoff_multiplier(), None);
        assert_eq!(Category::Unknown.backoff_multiplier(), None);
    }

    #[test]
    fn test_retryable_categories() {
        // Only transient outcomes are worth another attempt

        let retryable: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|category| category.is_retryable())
            .collect();

        assert_eq!(
            retryable,
            vec![
                Category::Throttling,
                Category::TemporaryError,
                Category::NetworkError
            ]
        );
    }

    #[test]
    fn test_object_not_found_is_informational() {
        // A resource that disappeared between listing and describing is expected

        assert_eq!(Category::ObjectNotFound.severity(), ErrorSeverity::Info);
        assert_eq!(Category::Throttling.severity(), ErrorSeverity::Warning);
        assert_eq!(Category::Unknown.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        // Labels are stable identifiers used in logs and alert routing

        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_label() {
        let result = "SLOW_DOWN".parse::<Category>();

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("SLOW_DOWN"));
    }

    #[test]
    fn test_serde_uses_screaming_snake_case_labels() {
        // Serialized form matches the canonical label

        let json = serde_json::to_string(&Category::ServiceDisabled).unwrap();
        assert_eq!(json, "\"SERVICE_DISABLED\"");

        let parsed: Category = serde_json::from_str("\"OBJECT_NOT_FOUND\"").unwrap();
        assert_eq!(parsed, Category::ObjectNotFound);
    }
}
