//! Offset pagination with the response envelope clients expect:
//! `{ data, links: {first, last, prev, next}, meta: {...} }`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;

/// Raw `?page=` query. Kept as a string so junk degrades to page 1
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn from_query(query: &PageQuery, per_page: i64) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub from: Option<i64>,
    pub last_page: i64,
    pub path: String,
    pub per_page: i64,
    pub to: Option<i64>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

fn page_url(path: &str, page: i64) -> String {
    format!("{}?page={}", path, page)
}

/// Envelope for `items` fetched with `req`, out of `total` rows, served at `path`.
pub fn paginate<T>(req: PageRequest, total: i64, items: Vec<T>, path: &str) -> Paginated<T> {
    let last_page = ((total + req.per_page - 1) / req.per_page).max(1);
    let count = items.len() as i64;
    let (from, to) = if count > 0 {
        (Some(req.offset() + 1), Some(req.offset() + count))
    } else {
        (None, None)
    };

    let links = PageLinks {
        first: page_url(path, 1),
        last: page_url(path, last_page),
        prev: (req.page > 1).then(|| page_url(path, req.page - 1)),
        next: (req.page < last_page).then(|| page_url(path, req.page + 1)),
    };
    let meta = PageMeta {
        current_page: req.page,
        from,
        last_page,
        path: path.to_string(),
        per_page: req.per_page,
        to,
        total,
    };

    Paginated {
        data: items,
        links,
        meta,
    }
}
