//! Pagination envelope construction.
//!
//! A page-size policy slices one page out of the handler's full sequence and
//! computes navigation links. The policy is an injected strategy: the
//! paginate stage only requires *a* [`PagePolicy`]; [`per_page`] builds the
//! default one.

use std::sync::Arc;

use slimrest_core::{Payload, PipelineError, PipelineResult};

use crate::context::RequestContext;

/// One page of a result sequence plus navigation metadata.
///
/// For any non-empty source sequence with an in-range request,
/// `1 <= page <= page_count`. `page_count` has a floor of 1 even for an
/// empty sequence.
pub struct PaginationEnvelope {
    /// The items belonging to the requested page.
    pub items: Vec<Payload>,
    /// 1-based requested page number.
    pub page: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Absolute URL of the next page, when `page < page_count`.
    pub next: Option<String>,
    /// Absolute URL of the previous page, when `page > 1`.
    pub prev: Option<String>,
}

/// Strategy producing a [`PaginationEnvelope`] from the full item sequence.
///
/// The policy reads the requested page from the context and is responsible
/// for link generation, so callers can swap in cursor schemes or different
/// query conventions without touching the stage.
pub type PagePolicy =
    Arc<dyn Fn(&RequestContext, Vec<Payload>) -> PipelineResult<PaginationEnvelope> + Send + Sync>;

/// Builds the default page-size policy.
///
/// Reads the 1-based `page` query parameter (absent means 1), slices
/// `items[(page-1)*page_size .. page*page_size]` clipped to bounds, and
/// resolves `next`/`prev` as absolute URLs for the current route with the
/// `page` parameter overridden.
///
/// # Panics
///
/// Panics if `page_size` is zero; a page size is a static declaration
/// mistake, not a request-time condition.
#[must_use]
pub fn per_page(page_size: usize) -> PagePolicy {
    assert!(page_size > 0, "page size must be at least 1");

    Arc::new(move |ctx, items| {
        let page = requested_page(ctx)?;
        let total = items.len();
        let page_count = page_count(total, page_size);
        let (start, end) = page_bounds(total, page_size, page);

        let next = if page < page_count {
            Some(ctx.page_url(page + 1)?)
        } else {
            None
        };
        let prev = if page > 1 {
            Some(ctx.page_url(page - 1)?)
        } else {
            None
        };

        let items: Vec<Payload> = items
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();

        Ok(PaginationEnvelope {
            items,
            page,
            page_count,
            next,
            prev,
        })
    })
}

fn requested_page(ctx: &RequestContext) -> PipelineResult<usize> {
    match ctx.query("page") {
        None => Ok(1),
        Some(raw) => match raw.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(PipelineError::client_input(
                "'page' query parameter must be a positive integer",
            )),
        },
    }
}

/// `ceil(total / page_size)` with a floor of 1.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// The half-open item range `[(page-1)*page_size, page*page_size)` clipped
/// to the sequence bounds.
#[must_use]
pub fn page_bounds(total: usize, page_size: usize, page: usize) -> (usize, usize) {
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn page_count_has_a_floor_of_one() {
        assert_eq!(page_count(0, 2), 1);
        assert_eq!(page_count(1, 2), 1);
        assert_eq!(page_count(2, 2), 1);
        assert_eq!(page_count(3, 2), 2);
        assert_eq!(page_count(5, 2), 3);
    }

    #[test]
    fn bounds_clip_to_sequence_length() {
        assert_eq!(page_bounds(5, 2, 1), (0, 2));
        assert_eq!(page_bounds(5, 2, 3), (4, 5));
        assert_eq!(page_bounds(5, 2, 9), (5, 5));
    }

    proptest! {
        #[test]
        fn pages_partition_the_sequence(total in 0_usize..500, page_size in 1_usize..50) {
            let count = page_count(total, page_size);
            prop_assert!(count >= 1);

            let mut covered = 0;
            for page in 1..=count {
                let (start, end) = page_bounds(total, page_size, page);
                prop_assert!(end >= start);
                prop_assert!(end - start <= page_size);
                prop_assert_eq!(start, covered);
                covered = end;
            }
            prop_assert_eq!(covered, total);
        }

        #[test]
        fn out_of_range_pages_are_empty(total in 0_usize..100, page_size in 1_usize..10) {
            let count = page_count(total, page_size);
            let (start, end) = page_bounds(total, page_size, count + 1);
            prop_assert_eq!(start, end);
        }
    }
}
