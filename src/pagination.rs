use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// PageParams
///
/// The `page_size` / `page_num` query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Records per page, clamped into [1, 100]. Defaults to 10.
    pub page_size: Option<i64>,
    /// 1-based page number. Defaults to 1.
    pub page_num: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> Result<Page, ApiError> {
        Page::new(
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.page_num.unwrap_or(1),
        )
    }
}

/// Page
///
/// A validated page request. Records are always ordered newest first; page `n`
/// skips `(n - 1) * size` records. A page past the end is empty, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    size: i64,
    num: i64,
}

impl Page {
    pub fn new(size: i64, num: i64) -> Result<Self, ApiError> {
        if num < 1 {
            return Err(ApiError::InvalidParam(format!("page_num must be >= 1, got {num}")));
        }

        Ok(Self {
            size: size.clamp(1, MAX_PAGE_SIZE),
            num,
        })
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn offset(&self) -> i64 {
        (self.num - 1).saturating_mul(self.size)
    }

    /// Applies this page to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(self.size).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(size).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            num: 1,
        }
    }
}
