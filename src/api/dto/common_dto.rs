//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::FetchOptions;

/// Default rows per page of the asset table.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Maximum rows per page of the asset table.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters accepted by tile endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SourceParams {
    /// Subgraph endpoint override. Rejected unless overrides are enabled.
    #[serde(default)]
    pub subgraph_url: Option<String>,
}

impl SourceParams {
    /// Converts into service fetch options.
    #[must_use]
    pub fn into_options(self) -> FetchOptions {
        FetchOptions {
            count: None,
            subgraph_url: self.subgraph_url,
        }
    }
}

/// Query parameters accepted by chart endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartParams {
    /// Number of periods to return (clamped to the configured maximum).
    #[serde(default)]
    pub count: Option<u32>,
    /// Subgraph endpoint override. Rejected unless overrides are enabled.
    #[serde(default)]
    pub subgraph_url: Option<String>,
}

impl ChartParams {
    /// Converts into service fetch options.
    #[must_use]
    pub fn into_options(self) -> FetchOptions {
        FetchOptions {
            count: self.count,
            subgraph_url: self.subgraph_url,
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Computes page metadata and the `[start, end)` item range for
    /// `page`/`per_page` over `total` items. Both inputs are clamped.
    #[must_use]
    pub fn paginate(page: u32, per_page: u32, total: usize) -> (Self, std::ops::Range<usize>) {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(per_page);

        let start = u64::from(page - 1) * u64::from(per_page);
        let start = usize::try_from(start.min(u64::from(total))).unwrap_or(usize::MAX);
        let end = start
            .saturating_add(per_page as usize)
            .min(total as usize);

        (
            Self {
                page,
                per_page,
                total,
                total_pages,
            },
            start..end,
        )
    }
}
