//! Sorting and paging helpers shared by the list pages
use std::cmp::Ordering;

/// Types that can be sorted by a named column
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Sort in place by `field`
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Number of pages, never less than one
pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Items on page `page` (zero based); an out of range page clamps to the last one
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page_size == 0 {
        return items.to_vec();
    }
    let page = page.min(page_count(items.len(), page_size) - 1);
    let start = page * page_size;
    let end = (start + page_size).min(items.len());
    items.get(start..end).unwrap_or(&[]).to_vec()
}

/// Sort indicator for a header cell
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        ""
    }
}
