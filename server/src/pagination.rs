use serde::Serialize;

/// Stable result envelope for paged queries.
///
/// `current_page` is zero-based. `total_pages` is `ceil(total / size)`; an
/// empty result set has zero pages and both boundary flags set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub is_first: bool,
    pub is_last: bool,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u64, size: u64, total: u64) -> Self {
        let total_pages = if size == 0 { 0 } else { total.div_ceil(size) };
        Self {
            data,
            current_page: page,
            page_size: size,
            total_elements: total,
            total_pages,
            is_first: page == 0,
            // Also true for a page past the end: there is nothing after it.
            is_last: total_pages == 0 || page + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            is_first: self.is_first,
            is_last: self.is_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_zero_pages_and_both_flags() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, 10, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
        assert!(page.is_first);
        assert!(page.is_last);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(page.is_first);
        assert!(!page.is_last);
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        let page = Paginated::new(vec![1, 2, 3], 1, 3, 6);
        assert_eq!(page.total_pages, 2);
        assert!(!page.is_first);
        assert!(page.is_last);
    }

    #[test]
    fn page_past_the_end_is_empty_and_last() {
        let page: Paginated<i32> = Paginated::new(vec![], 5, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(page.data.is_empty());
        assert!(!page.is_first);
        assert!(page.is_last);
    }

    #[test]
    fn map_preserves_envelope() {
        let page = Paginated::new(vec![1, 2], 0, 2, 5).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }
}
