//! Keyword search over course and module titles

use std::sync::Arc;

use lms_shared::constants::SEARCH_RESULT_LIMIT;
use tracing::debug;

use crate::domain::{merge_hits, SearchHit, SearchQuery, SearchScope};
use crate::error::DomainError;
use crate::repositories::CourseRepository;

pub struct SearchService {
    courses: Arc<dyn CourseRepository>,
}

impl SearchService {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Matching courses and modules within `scope`, newest first.
    /// A blank query yields no hits.
    pub async fn search(&self, scope: SearchScope, raw: &str) -> Result<Vec<SearchHit>, DomainError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return Ok(Vec::new());
        };

        let pattern = query.like_pattern();
        let limit = SEARCH_RESULT_LIMIT as i64;
        let courses = self.courses.search_courses(scope, &pattern, limit).await?;
        let modules = self.courses.search_modules(scope, &pattern, limit).await?;
        debug!(
            "Search '{}' matched {} course(s) and {} module(s)",
            query.text(),
            courses.len(),
            modules.len()
        );

        Ok(merge_hits(courses, modules, SEARCH_RESULT_LIMIT))
    }
}
