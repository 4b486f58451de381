//! Failure classifier
//!
//! Turns a caught [`CloudFailure`] and the action that triggered it into a
//! [`ClassifiedFailure`]. The classifier holds no mutable state; one instance
//! can be shared across any number of threads.

use crate::config::ClassifierConfig;
use crate::core_types::{
    Category, ClassifiedFailure, ClientFailure, CloudFailure, FailureSource, PageResult,
    ServiceFailure,
};
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::logging::{log_debug, log_error, log_info};
use crate::rules::{ClassificationInput, ClientRule, RuleTable, CLIENT_RULES, SERVICE_RULES};
use once_cell::sync::Lazy;

static DEFAULT_CLASSIFIER: Lazy<Classifier> = Lazy::new(Classifier::default);

/// Classify `failure` with the default configuration and the built-in rule tables.
///
/// See [`Classifier::classify`].
pub fn classify(failure: CloudFailure, action: &str) -> TaxonomyResult<ClassifiedFailure> {
    DEFAULT_CLASSIFIER.classify(failure, action)
}

/// Maps failures to categories using read-only rule tables.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    service_rules: &'static RuleTable,
    client_rules: &'static [ClientRule],
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            config: ClassifierConfig::default(),
            service_rules: &SERVICE_RULES,
            client_rules: CLIENT_RULES,
        }
    }
}

impl Classifier {
    /// Create a classifier using the built-in rule tables.
    pub fn new(config: ClassifierConfig) -> TaxonomyResult<Self> {
        Self::with_rules(config, &SERVICE_RULES, CLIENT_RULES)
    }

    /// Create a classifier with custom rule tables.
    pub fn with_rules(
        config: ClassifierConfig,
        service_rules: &'static RuleTable,
        client_rules: &'static [ClientRule],
    ) -> TaxonomyResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            service_rules,
            client_rules,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Effective backoff multiplier for `category` under this classifier's config.
    pub fn multiplier_for(&self, category: Category) -> u32 {
        self.config.multiplier_for(category)
    }

    /// Classify a failed call.
    ///
    /// Service failures are matched against the service rule table, group by
    /// group, and fall back to [`Category::Unknown`]. Client failures match
    /// [`Category::NetworkError`] or fall back to [`Category::Unknown`].
    /// Fallbacks are logged at ERROR so the rule table can be extended.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::UnrecognizedFailure`] for a
    /// [`CloudFailure::Other`]; the classifier never guesses at those.
    pub fn classify(
        &self,
        failure: CloudFailure,
        action: &str,
    ) -> TaxonomyResult<ClassifiedFailure> {
        log_info!(
            action = %action,
            failure_type = %failure.type_name(),
            message = ?failure.message(),
            "Exception during AWS API call"
        );

        match failure {
            CloudFailure::Service(failure) => Ok(self.classify_service(failure, action)),
            CloudFailure::Client(failure) => Ok(self.classify_client(failure, action)),
            CloudFailure::Other(failure) => Err(TaxonomyError::unrecognized_failure(failure)),
        }
    }

    /// Category a service failure would receive, without logging.
    pub fn service_category(&self, failure: &ServiceFailure, action: &str) -> Category {
        let input = ClassificationInput::from_service(failure, action);
        self.service_rules
            .evaluate(&input)
            .map_or(Category::Unknown, |(category, _)| category)
    }

    /// Category a client failure would receive, without logging.
    pub fn client_category(&self, failure: &ClientFailure) -> Category {
        if self.matching_client_rule(failure).is_some() {
            Category::NetworkError
        } else {
            Category::Unknown
        }
    }

    /// Turn one paged call's outcome into a [`PageResult`].
    ///
    /// `Ok(token)` carries the continuation token of the page just fetched;
    /// failures are classified under `action`.
    pub fn classify_page(
        &self,
        outcome: Result<Option<String>, CloudFailure>,
        action: &str,
    ) -> TaxonomyResult<PageResult> {
        match outcome {
            Ok(token) => {
                let mut page = PageResult::empty();
                page.set_next_page_token(token);
                Ok(page)
            }
            Err(failure) => self
                .classify(failure, action)
                .map(PageResult::with_exception),
        }
    }

    fn classify_service(&self, failure: ServiceFailure, action: &str) -> ClassifiedFailure {
        let input = ClassificationInput::from_service(&failure, action);
        let category = match self.service_rules.evaluate(&input) {
            Some((category, rule)) => {
                log_debug!(
                    action = %action,
                    category = %category,
                    rule = %rule,
                    "Service failure matched rule"
                );
                category
            }
            None => {
                log_error!(
                    action = %action,
                    failure_type = %failure.type_name,
                    error_code = ?failure.error_code,
                    status_code = failure.status_code,
                    message = %failure,
                    "Unable to categorize AmazonServiceException"
                );
                Category::Unknown
            }
        };

        ClassifiedFailure::new(category, action, FailureSource::Service(failure))
    }

    fn classify_client(&self, failure: ClientFailure, action: &str) -> ClassifiedFailure {
        let category = match self.matching_client_rule(&failure) {
            Some(rule) => {
                log_debug!(
                    action = %action,
                    rule = %rule,
                    "Client failure matched network rule"
                );
                Category::NetworkError
            }
            None => {
                log_error!(
                    action = %action,
                    failure_type = %failure.type_name,
                    message = %failure,
                    "Unable to categorize AmazonClientException"
                );
                Category::Unknown
            }
        };

        ClassifiedFailure::new(
            category,
            action,
            FailureSource::Raw {
                type_name: failure.type_name,
                message: failure.message,
            },
        )
    }

    fn matching_client_rule(&self, failure: &ClientFailure) -> Option<&'static ClientRule> {
        self.client_rules
            .iter()
            .find(|rule| rule.matches(failure, self.config.max_cause_depth))
    }
}
