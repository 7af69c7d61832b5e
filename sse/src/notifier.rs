use chrono::{DateTime, Utc};

/// Tracks the newest publish time a single SSE connection has been told about.
///
/// A connection starts from the publish time of the newest article that
/// existed when it connected (or nothing, for an empty store). Afterwards an
/// article passes only if its publish time is strictly greater than the last
/// one that passed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Notifier {
    last_published_at: Option<DateTime<Utc>>,
}

impl Notifier {
    pub fn new(last_published_at: Option<DateTime<Utc>>) -> Self {
        Self { last_published_at }
    }

    pub fn last_published_at(&self) -> Option<DateTime<Utc>> {
        self.last_published_at
    }

    /// Returns `true` and advances the watermark when `published_at` is newer
    /// than anything seen so far.
    pub fn observe(&mut self, published_at: DateTime<Utc>) -> bool {
        match self.last_published_at {
            Some(last) if published_at <= last => false,
            _ => {
                self.last_published_at = Some(published_at);
                true
            }
        }
    }
}
