//! Asset table DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{DEFAULT_PER_PAGE, PaginationMeta};
use crate::domain::assets_table::{ASSETS_HEADER_TEXT, ASSETS_INFO_TOOLTIP};
use crate::domain::{AssetRow, SortDirection, SortField};
use crate::service::{AssetsSnapshot, FetchOptions};

/// Query parameters for `GET /api/v1/assets`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssetsParams {
    /// Column to sort by. Defaults to `value`.
    #[serde(default)]
    pub sort_field: SortField,
    /// Sort direction. Defaults to `desc`.
    #[serde(default)]
    pub sort: SortDirection,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page (max 100). Defaults to 10.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Subgraph endpoint override. Rejected unless overrides are enabled.
    #[serde(default)]
    pub subgraph_url: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for AssetsParams {
    fn default() -> Self {
        Self {
            sort_field: SortField::default(),
            sort: SortDirection::default(),
            page: default_page(),
            per_page: default_per_page(),
            subgraph_url: None,
        }
    }
}

impl AssetsParams {
    /// Service fetch options for this request.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            count: None,
            subgraph_url: self.subgraph_url.clone(),
        }
    }
}

/// Response body for `GET /api/v1/assets`.
///
/// While loading, `is_loading` is true and `rows` is empty.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetsResponse {
    /// Table title.
    pub header_text: String,
    /// Explanatory tooltip text.
    pub info_tooltip: String,
    /// Whether the source data has not arrived yet.
    pub is_loading: bool,
    /// Period the rows belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Rows on the requested page.
    pub rows: Vec<AssetRow>,
    /// Applied sort column.
    pub sort_field: SortField,
    /// Applied sort direction.
    pub sort: SortDirection,
    /// Page metadata.
    pub pagination: PaginationMeta,
    /// Link to the query in the subgraph explorer.
    pub subgraph_query_url: String,
}

impl AssetsResponse {
    /// Sorts and paginates a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: AssetsSnapshot, params: &AssetsParams) -> Self {
        let is_loading = snapshot.table.is_none();
        let (timestamp, rows) = match snapshot.table {
            Some(mut table) => {
                table.sort(params.sort_field, params.sort);
                (Some(table.timestamp), table.rows)
            }
            None => (None, Vec::new()),
        };

        let (pagination, range) = PaginationMeta::paginate(params.page, params.per_page, rows.len());
        let rows = rows
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();

        Self {
            header_text: ASSETS_HEADER_TEXT.to_string(),
            info_tooltip: ASSETS_INFO_TOOLTIP.to_string(),
            is_loading,
            timestamp,
            rows,
            sort_field: params.sort_field,
            sort: params.sort,
            pagination,
            subgraph_query_url: snapshot.subgraph_query_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetsTable;

    fn row(token: &str, value: &str) -> AssetRow {
        AssetRow {
            token: token.to_string(),
            category: "Stablecoins".to_string(),
            value: value.to_string(),
            display_value: format!("${value}"),
        }
    }

    fn snapshot(rows: Vec<AssetRow>) -> AssetsSnapshot {
        AssetsSnapshot {
            table: Some(AssetsTable { timestamp: 7, rows }),
            subgraph_query_url: "u".to_string(),
        }
    }

    #[test]
    fn loading_snapshot_has_no_rows() {
        let snapshot = AssetsSnapshot {
            table: None,
            subgraph_query_url: "u".to_string(),
        };
        let response = AssetsResponse::from_snapshot(snapshot, &AssetsParams::default());
        assert!(response.is_loading);
        assert!(response.rows.is_empty());
        assert_eq!(response.header_text, "Holdings");
    }

    #[test]
    fn second_page_after_ascending_sort() {
        let rows = (1..=12).map(|i| row(&format!("T{i:02}"), &i.to_string())).collect();
        let params = AssetsParams {
            sort: SortDirection::Asc,
            page: 2,
            ..AssetsParams::default()
        };
        let response = AssetsResponse::from_snapshot(snapshot(rows), &params);
        let tokens: Vec<&str> = response.rows.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["T11", "T12"]);
        assert_eq!(response.pagination.total, 12);
        assert_eq!(response.pagination.total_pages, 2);
        assert_eq!(response.timestamp, Some(7));
    }
}
