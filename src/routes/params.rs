use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

/// Page window shared by every listing endpoint.
///
/// Query structs carry `page`/`per_page` inline instead of flattening this
/// struct: serde_urlencoded cannot deserialize numbers through
/// `#[serde(flatten)]`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Clamps the window to sane bounds. The offset saturates, so a page
    /// number near `i64::MAX` yields an empty page instead of overflowing.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MovieSortBy {
    CreatedAt,
    Title,
    ReleaseDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MovieQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub category_id: Option<i32>,
    pub status: Option<String>,
    pub sort_by: Option<MovieSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl MovieQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScreeningQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub movie_id: Option<i32>,
    pub room_id: Option<i32>,
    /// Restrict to screenings starting on this UTC calendar day.
    pub day: Option<NaiveDate>,
}

impl ScreeningQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub screening_id: Option<i32>,
    pub sold: Option<bool>,
}

impl TicketListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShiftQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub employee_id: Option<i32>,
    pub position: Option<String>,
    pub day: Option<NaiveDate>,
}

impl ShiftQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuperTicketQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// `true` keeps only owned passes, `false` only unsold ones.
    pub owned: Option<bool>,
}

impl SuperTicketQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
        Pagination { page, per_page }.normalize()
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        assert_eq!(window(None, None), (1, 20, 0));
    }

    #[test]
    fn zero_and_negative_values_are_clamped() {
        assert_eq!(window(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(window(Some(-5), Some(-5)), (1, 1, 0));
    }

    #[test]
    fn per_page_is_capped() {
        assert_eq!(window(Some(2), Some(1000)), (2, 100, 100));
    }

    #[test]
    fn a_huge_page_number_does_not_overflow_the_offset() {
        let (page, per_page, offset) = window(Some(i64::MAX), Some(100));
        assert_eq!(page, i64::MAX);
        assert_eq!(per_page, 100);
        assert_eq!(offset, i64::MAX);
    }
}
