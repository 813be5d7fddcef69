use crate::repos::error::RepoError;

pub const PER_PAGE: i64 = 10;

/// 1-based page number, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(number: i64) -> Result<Self, RepoError> {
        if number <= 0 {
            return Err(RepoError::InvalidPage(number));
        }
        Ok(Self(number))
    }

    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.0 - 1).saturating_mul(PER_PAGE)
    }

    /// Slice an already-ordered sequence.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .iter()
            .skip(offset)
            .take(PER_PAGE as usize)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_pages() {
        assert!(matches!(Page::new(0), Err(RepoError::InvalidPage(0))));
        assert!(matches!(Page::new(-3), Err(RepoError::InvalidPage(-3))));
    }

    #[test]
    fn slices_ten_per_page() {
        let items: Vec<i64> = (1..=25).collect();
        let first: Vec<i64> = (1..=10).collect();
        let last: Vec<i64> = (21..=25).collect();
        assert_eq!(Page::new(1).unwrap().slice(&items), first);
        assert_eq!(Page::new(3).unwrap().slice(&items), last);
        assert!(Page::new(4).unwrap().slice(&items).is_empty());
        assert!(Page::new(i64::MAX).unwrap().slice(&items).is_empty());
    }

    #[test]
    fn offset_follows_page_number() {
        assert_eq!(Page::new(1).unwrap().offset(), 0);
        assert_eq!(Page::new(2).unwrap().offset(), 10);
    }
}
