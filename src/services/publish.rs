//! Publish state transitions
//!
//! `published_at` is set exactly while an article is published: it is
//! stamped on the transition into the published state, kept while the
//! article stays published, and cleared on unpublish.

use chrono::{DateTime, Utc};

use crate::models::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishState {
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl PublishState {
    pub fn of(article: &Article) -> Self {
        Self {
            published: article.published,
            published_at: article.published_at,
        }
    }

    /// Flip the published flag
    pub fn toggled(self, now: DateTime<Utc>) -> Self {
        self.transition_to(!self.published, now)
    }

    /// Move to `published`, keeping the original timestamp if already live
    pub fn transition_to(self, published: bool, now: DateTime<Utc>) -> Self {
        match (self.published, published) {
            (true, true) => Self {
                published: true,
                published_at: self.published_at.or(Some(now)),
            },
            (false, true) => Self {
                published: true,
                published_at: Some(now),
            },
            (_, false) => Self {
                published: false,
                published_at: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const DRAFT: PublishState = PublishState {
        published: false,
        published_at: None,
    };

    #[test]
    fn test_toggle_sets_and_clears_published_at() {
        let now = Utc::now();

        let live = DRAFT.toggled(now);
        assert!(live.published);
        assert_eq!(live.published_at, Some(now));

        let back = live.toggled(now + Duration::minutes(5));
        assert_eq!(back, DRAFT);
    }

    #[test]
    fn test_republish_stamps_new_time() {
        let first = Utc::now();
        let later = first + Duration::days(1);

        let state = DRAFT.toggled(first).toggled(first).toggled(later);
        assert_eq!(state.published_at, Some(later));
    }

    #[test]
    fn test_staying_published_keeps_original_time() {
        let first = Utc::now();
        let live = DRAFT.transition_to(true, first);

        let edited = live.transition_to(true, first + Duration::hours(3));
        assert_eq!(edited.published_at, Some(first));
    }

    #[test]
    fn test_staying_draft_has_no_timestamp() {
        let state = DRAFT.transition_to(false, Utc::now());
        assert_eq!(state, DRAFT);
    }
}
