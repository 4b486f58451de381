//! Outcome of one paged AWS call.

use super::classified::ClassifiedFailure;

/// Result of a single page fetch: either a classified failure, a
/// continuation token, or neither (last page).
///
/// `next_page_token` is never `Some("")`; an empty token means there are no
/// more pages and is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    exception: Option<ClassifiedFailure>,
    next_page_token: Option<String>,
}

impl PageResult {
    /// A successful last page.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_next_page(token: impl Into<String>) -> Self {
        Self {
            exception: None,
            next_page_token: normalize(Some(token.into())),
        }
    }

    pub fn with_exception(exception: ClassifiedFailure) -> Self {
        Self {
            exception: Some(exception),
            next_page_token: None,
        }
    }

    pub fn exception(&self) -> Option<&ClassifiedFailure> {
        self.exception.as_ref()
    }

    pub fn set_exception(&mut self, exception: Option<ClassifiedFailure>) {
        self.exception = exception;
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// Store the continuation token; `Some("")` clears it.
    pub fn set_next_page_token(&mut self, token: Option<String>) {
        self.next_page_token = normalize(token);
    }

    pub fn has_more_pages(&self) -> bool {
        self.next_page_token.is_some()
    }

    pub fn into_exception(self) -> Option<ClassifiedFailure> {
        self.exception
    }
}

fn normalize(token: Option<String>) -> Option<String> {
    token.filter(|token| !token.is_empty())
}
