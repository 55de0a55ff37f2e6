// ============================================================================
// LMS Core - Search
// File: crates/lms-core/src/domain/search.rs
// Description: Query parsing and course/module result aggregation
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::{CourseStatus, ValidityUnit};

/// Non-blank search text, ready to be bound as a LIKE pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self { text: text.to_string() })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `%text%` with `\`, `%` and `_` escaped, for `ILIKE ... ESCAPE '\'`.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for c in self.text.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Which courses a search may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Approved courses, for students.
    Catalog,
    /// Every course owned by one instructor, regardless of status.
    Instructor(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchHitKind {
    Course,
    Module,
}

/// One search result. Modules carry their parent course's fields and title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: SearchHitKind,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: CourseStatus,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub validity_value: Option<i32>,
    pub validity_unit: Option<ValidityUnit>,
    pub expires_at: Option<DateTime<Utc>>,
    pub instructor_id: Uuid,
    pub instructor_name: Option<String>,
    pub course_id: Uuid,
    pub course_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Concatenates course and module hits, newest first, capped at `limit`.
pub fn merge_hits(courses: Vec<SearchHit>, modules: Vec<SearchHit>, limit: usize) -> Vec<SearchHit> {
    let mut hits = courses;
    hits.extend(modules);
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hit(kind: SearchHitKind, minutes: i64) -> SearchHit {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        SearchHit {
            id: Uuid::new_v4(),
            kind,
            title: format!("{:?} {}", kind, minutes),
            description: None,
            category: None,
            status: CourseStatus::Approved,
            difficulty: None,
            thumbnail_url: None,
            validity_value: None,
            validity_unit: None,
            expires_at: None,
            instructor_id: Uuid::new_v4(),
            instructor_name: None,
            course_id: Uuid::new_v4(),
            course_title: (kind == SearchHitKind::Module).then(|| "Parent".to_string()),
            created_at: base + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(SearchQuery::parse(""), None);
        assert_eq!(SearchQuery::parse(" \t\n "), None);
        assert_eq!(SearchQuery::parse("  rust ").unwrap().text(), "rust");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        let q = SearchQuery::parse("100%_off\\").unwrap();
        assert_eq!(q.like_pattern(), "%100\\%\\_off\\\\%");
    }

    #[test]
    fn test_merge_orders_newest_first_and_tags() {
        let merged = merge_hits(
            vec![hit(SearchHitKind::Course, 5)],
            vec![hit(SearchHitKind::Module, 10)],
            20,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind, SearchHitKind::Module);
        assert_eq!(merged[0].course_title.as_deref(), Some("Parent"));
        assert_eq!(merged[1].kind, SearchHitKind::Course);
        assert!(merged[1].course_title.is_none());
    }

    #[test]
    fn test_merge_caps_results() {
        let courses = (0..15).map(|i| hit(SearchHitKind::Course, i)).collect();
        let modules = (15..30).map(|i| hit(SearchHitKind::Module, i)).collect();
        let merged = merge_hits(courses, modules, 20);
        assert_eq!(merged.len(), 20);
        assert!(merged.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        // The oldest ten are the ones dropped.
        assert_eq!(merged.last().unwrap().created_at, hit(SearchHitKind::Course, 10).created_at);
    }
}
