//! New/seen boundary between forwarded and unforwarded posts.

use crate::twitter::Post;

/// Id of the most recently forwarded post.
///
/// Every post at or behind this id in the feed has been forwarded; every
/// post ahead of it has not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermark {
    last_id: Option<String>,
}

impl Watermark {
    /// Watermark for a process that has never forwarded anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(last_id: Option<String>) -> Self {
        Self { last_id }
    }

    #[must_use]
    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Posts in a newest-first batch that come before the watermark.
    ///
    /// Scanning stops at the first post whose id equals the watermark. When
    /// the watermark is absent or not on the page, the whole page is unseen.
    #[must_use]
    pub fn unseen<'a>(&self, batch: &'a [Post]) -> &'a [Post] {
        let Some(last_id) = self.last_id.as_deref() else {
            return batch;
        };
        let end = batch
            .iter()
            .position(|post| post.id == last_id)
            .unwrap_or(batch.len());
        &batch[..end]
    }

    /// Move the watermark to `id`, replacing the previous value.
    pub fn advance(&mut self, id: impl Into<String>) {
        self.last_id = Some(id.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str]) -> Vec<Post> {
        ids.iter().map(|id| Post::new(*id)).collect()
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_watermark_takes_whole_page() {
        let batch = page(&["5", "4", "3", "2", "1"]);
        assert_eq!(ids(Watermark::empty().unseen(&batch)), ["5", "4", "3", "2", "1"]);
    }

    #[test]
    fn test_stops_at_watermark() {
        let batch = page(&["5", "4", "3", "2", "1"]);
        let mark = Watermark::new(Some("3".into()));
        assert_eq!(ids(mark.unseen(&batch)), ["5", "4"]);
    }

    #[test]
    fn test_newest_equal_to_watermark_is_up_to_date() {
        let batch = page(&["5", "4", "3"]);
        let mark = Watermark::new(Some("5".into()));
        assert!(mark.unseen(&batch).is_empty());
    }

    #[test]
    fn test_unmatched_watermark_takes_whole_page() {
        let batch = page(&["9", "8", "7", "6", "5"]);
        let mark = Watermark::new(Some("3".into()));
        assert_eq!(mark.unseen(&batch).len(), 5);
    }

    #[test]
    fn test_ids_are_compared_not_ordered() {
        // "10" sorts before "9" as a string; position decides, not value.
        let batch = page(&["10", "9"]);
        let mark = Watermark::new(Some("9".into()));
        assert_eq!(ids(mark.unseen(&batch)), ["10"]);
    }

    #[test]
    fn test_advance_overwrites() {
        let mut mark = Watermark::new(Some("1".into()));
        mark.advance("2");
        assert_eq!(mark.last_id(), Some("2"));
    }
}
