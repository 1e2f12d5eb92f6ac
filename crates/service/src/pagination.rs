//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, helpers to normalize inputs and
//! the `Paged` envelope returned by list operations.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};
use serde::Serialize;

use crate::errors::ServiceError;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let d = Self::default();
        Self { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) }
    }

    /// Clamp to sane defaults and convert to `u64` (0-based page index, page size)
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results plus the total across all pages.
#[derive(Clone, Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged { items: self.items.into_iter().map(f).collect(), page: self.page, per_page: self.per_page, total: self.total }
    }

    pub fn empty(opts: Pagination) -> Self {
        let (idx, per) = opts.normalize();
        Paged { items: Vec::new(), page: idx as u32 + 1, per_page: per as u32, total: 0 }
    }
}

/// Run `select` for the requested page.
pub async fn fetch_page<'db, E, C>(db: &'db C, select: Select<E>, opts: Pagination) -> Result<Paged<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'db,
    C: ConnectionTrait,
{
    let (page_idx, per_page) = opts.normalize();
    // SeaORM's paginate uses 0-based page index internally via fetch_page
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Paged { items, page: page_idx as u32 + 1, per_page: per_page as u32, total })
}

#[cfg(test)]
mod tests {
    use super::{Paged, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::new(None, None);
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
        assert_eq!(Pagination::new(Some(3), None).page, 3);
    }

    #[test]
    fn map_keeps_envelope() {
        let p = Paged { items: vec![1, 2], page: 2, per_page: 2, total: 4 }.map(|n| n * 10);
        assert_eq!(p.items, vec![10, 20]);
        assert_eq!((p.page, p.per_page, p.total), (2, 2, 4));
    }
}
