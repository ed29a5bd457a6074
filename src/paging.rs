use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

const TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// Raw `page`, `size` and `sort` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn sql(&self) -> String {
        format!("{} {}", self.column, if self.descending { "DESC" } else { "ASC" })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub order_by: Option<OrderBy>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size, order_by: None }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl PageParams {
    /// Applies configured defaults and caps. `sortable` maps public field names
    /// to columns; anything else in `sort` is rejected.
    pub fn resolve(&self, api: &ApiConfig, sortable: &[(&str, &'static str)]) -> AppResult<PageRequest> {
        let size = self.size.unwrap_or(api.default_page_size).clamp(1, api.max_page_size);
        let mut request = PageRequest::new(self.page.unwrap_or(0), size);

        if let Some(raw) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let (field, direction) = match raw.split_once(',') {
                Some((f, d)) => (f.trim(), d.trim()),
                None => (raw, "asc"),
            };
            let column = sortable
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(field))
                .map(|(_, column)| *column)
                .ok_or_else(|| AppError::ValidationError {
                    field: "sort".to_string(),
                    message: format!("cannot sort by '{}'", field),
                })?;
            let descending = match direction.to_ascii_lowercase().as_str() {
                "asc" | "" => false,
                "desc" => true,
                other => {
                    return Err(AppError::ValidationError {
                        field: "sort".to_string(),
                        message: format!("unknown sort direction '{}'", other),
                    })
                }
            };
            request.order_by = Some(OrderBy { column, descending });
        }
        Ok(request)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }
}

/// Body is the bare item array; the total travels in `X-Total-Count`.
impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let mut res = Json(self.items).into_response();
        if let Ok(v) = HeaderValue::from_str(&self.total.to_string()) {
            res.headers_mut().insert(TOTAL_COUNT, v);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ApiConfig {
        ApiConfig { default_page_size: 20, max_page_size: 100, max_body_bytes: 1024 * 1024 }
    }

    const SORTABLE: &[(&str, &str)] = &[("id", "id"), ("start", "start_ts")];

    #[test]
    fn test_defaults_and_clamp() {
        let p = PageParams::default().resolve(&api(), SORTABLE).unwrap();
        assert_eq!((p.page, p.size, p.order_by), (0, 20, None));

        let p = PageParams { page: Some(3), size: Some(5000), sort: None }.resolve(&api(), SORTABLE).unwrap();
        assert_eq!(p.size, 100);
        assert_eq!(p.offset(), 300);

        let p = PageParams { page: None, size: Some(0), sort: None }.resolve(&api(), SORTABLE).unwrap();
        assert_eq!(p.size, 1);
    }

    #[test]
    fn test_sort_parsing() {
        let p = PageParams { sort: Some("start,desc".into()), ..Default::default() }
            .resolve(&api(), SORTABLE)
            .unwrap();
        assert_eq!(p.order_by.unwrap().sql(), "start_ts DESC");

        let p = PageParams { sort: Some("ID".into()), ..Default::default() }.resolve(&api(), SORTABLE).unwrap();
        assert_eq!(p.order_by.unwrap().sql(), "id ASC");
    }

    #[test]
    fn test_unknown_sort_rejected() {
        let bad_field = PageParams { sort: Some("car_id; DROP TABLE shifts".into()), ..Default::default() };
        assert!(bad_field.resolve(&api(), SORTABLE).is_err());
        let bad_dir = PageParams { sort: Some("id,sideways".into()), ..Default::default() };
        assert!(bad_dir.resolve(&api(), SORTABLE).is_err());
    }
}
