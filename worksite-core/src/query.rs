//! Search, filtering, and pagination of project lists.

use chrono::NaiveDate;
use serde::Serialize;

use crate::project::Project;
use crate::status::ProjectStatus;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 200;

/// Parameters for listing projects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Free-text search over code, name, client, and address.
    pub q: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub include_archived: bool,
    /// 1-based; `None` or 0 means the first page.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    /// Effective page number.
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Whether a project passes every filter (pagination aside).
    pub fn matches(&self, project: &Project) -> bool {
        matches_query(project, self.q.as_deref())
            && matches_status(project, self.status)
            && overlaps_range(project, self.start, self.end)
            && (self.include_archived || !project.archived)
    }

    /// Filter then paginate a full list.
    pub fn apply(&self, projects: Vec<Project>) -> Page<Project> {
        let filtered: Vec<Project> = projects.into_iter().filter(|p| self.matches(p)).collect();
        paginate(filtered, self.page(), self.page_size())
    }

    /// Query-string pairs for a list request. Unset filters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.code().to_string()));
        }
        if let Some(start) = self.start {
            pairs.push(("start", start.to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.to_string()));
        }
        if self.include_archived {
            pairs.push(("includeArchived", "true".to_string()));
        }
        pairs.push(("page", self.page().to_string()));
        pairs.push(("pageSize", self.page_size().to_string()));
        pairs
    }
}

/// One page of results plus the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 || self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size as usize) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Case-insensitive substring search over code, name, client, and address.
/// The needle is trimmed first; an empty or whitespace-only query matches
/// everything.
pub fn matches_query(project: &Project, q: Option<&str>) -> bool {
    let needle = match q.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return true,
    };
    let haystack = format!(
        "{} {} {} {}",
        project.project_code, project.name, project.client_name, project.address
    )
    .to_lowercase();
    haystack.contains(&needle)
}

pub fn matches_status(project: &Project, status: Option<ProjectStatus>) -> bool {
    status.is_none_or(|s| project.status == s)
}

/// Inclusive overlap between the project's dates and the requested range.
///
/// Projects missing either date are never excluded by a range filter.
pub fn overlaps_range(project: &Project, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    let (Some(ps), Some(pe)) = (project.start_date, project.end_date) else {
        return true;
    };
    match (start, end) {
        (Some(s), Some(e)) => ps <= e && pe >= s,
        (Some(s), None) => pe >= s,
        (None, Some(e)) => ps <= e,
        (None, None) => true,
    }
}

/// Slice out one page. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let total = items.len();
    let offset = (page as usize - 1).saturating_mul(page_size as usize);
    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();
    Page {
        items,
        total,
        page,
        page_size,
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
