//! crates/quotevault_core/src/feed.rs
//!
//! The quote feed controller.
//!
//! Owns the visible, ordered quote list under combined pagination + category
//! filter + text search, the per-item favorite toggle, and the daily
//! featured quote. All fetch failures are absorbed here: a failed request
//! mutates no accumulated state and is logged, never surfaced as a crash.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::domain::{CategoryFilter, FeedFilter, PageRange, Quote, QuoteId};
use crate::ports::{IdentityService, QuoteStore};
use crate::quote_of_day;

/// Default page window of the quote listing.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Client-only, transient feed state plus the ports it draws from.
pub struct QuoteFeed {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn QuoteStore>,
    page_size: usize,
    page: usize,
    has_more: bool,
    filter: FeedFilter,
    quotes: Vec<Quote>,
    favorites: HashSet<QuoteId>,
    quote_of_day: Option<Quote>,
}

impl QuoteFeed {
    pub fn new(identity: Arc<dyn IdentityService>, store: Arc<dyn QuoteStore>) -> Self {
        Self::with_page_size(identity, store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        identity: Arc<dyn IdentityService>,
        store: Arc<dyn QuoteStore>,
        page_size: usize,
    ) -> Self {
        Self {
            identity,
            store,
            // A zero-row window could never come back full and would latch
            // `has_more` off on the first fetch; clamp to one row.
            page_size: page_size.max(1),
            page: 0,
            has_more: true,
            filter: FeedFilter::default(),
            quotes: Vec::new(),
            favorites: HashSet::new(),
            quote_of_day: None,
        }
    }

    //=====================================================================================
    // Read accessors
    //=====================================================================================

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn is_favorite(&self, quote_id: QuoteId) -> bool {
        self.favorites.contains(&quote_id)
    }

    pub fn favorite_ids(&self) -> &HashSet<QuoteId> {
        &self.favorites
    }

    pub fn quote_of_day(&self) -> Option<&Quote> {
        self.quote_of_day.as_ref()
    }

    //=====================================================================================
    // Pagination / filter protocol
    //=====================================================================================

    /// Fetch the next window and append it.
    ///
    /// No-op once the previous window came back short. Page index and
    /// `has_more` move only after the fetch resolves, so page progression is
    /// monotonic under non-overlapping calls.
    pub async fn load_next_page(&mut self) {
        if !self.has_more {
            return;
        }

        let range = PageRange::for_page(self.page, self.page_size);

        match self.store.fetch_quotes(&self.filter, range).await {
            Ok(rows) => {
                let count = rows.len();
                self.quotes.extend(rows);
                self.page += 1;
                if count < self.page_size {
                    self.has_more = false;
                }
            }
            Err(err) => {
                warn!("Quote page fetch failed, leaving feed unchanged: {err}");
            }
        }
    }

    /// Discard the accumulation and fetch page 0 under the current filter.
    ///
    /// Reloads cannot interleave: every fetch runs to completion while the
    /// caller holds `&mut self`, so a later reset always observes the state
    /// the previous one left behind and the last reload wins.
    pub async fn reset_and_reload(&mut self) {
        self.quotes.clear();
        self.page = 0;
        self.has_more = true;
        self.load_next_page().await;
    }

    /// Change the category tab. Any change fully resets the feed.
    pub async fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.reset_and_reload().await;
    }

    /// Change the search text. Any change fully resets the feed.
    pub async fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.reset_and_reload().await;
    }

    //=====================================================================================
    // Favorites
    //=====================================================================================

    /// Optimistic favorite toggle.
    ///
    /// The local set flips first; the remote mutation follows and is not
    /// rolled back on failure. Reconciliation with server truth happens
    /// wholesale via [`QuoteFeed::reload_favorites`]. Without a current
    /// user this is a silent no-op.
    pub async fn toggle_favorite(&mut self, quote_id: QuoteId) {
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(err) => {
                warn!("Favorite toggle skipped, no user available: {err}");
                return;
            }
        };

        if self.favorites.remove(&quote_id) {
            if let Err(err) = self.store.remove_favorite(user.id, quote_id).await {
                warn!("Favorite delete for quote {quote_id} failed: {err}");
            }
        } else {
            self.favorites.insert(quote_id);
            if let Err(err) = self.store.add_favorite(user.id, quote_id).await {
                warn!("Favorite insert for quote {quote_id} failed: {err}");
            }
        }
    }

    /// Replace the local favorite set with server truth.
    pub async fn reload_favorites(&mut self) {
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            _ => return,
        };

        match self.store.favorite_ids(user.id).await {
            Ok(ids) => self.favorites = ids.into_iter().collect(),
            Err(err) => warn!("Favorites reload failed, keeping local set: {err}"),
        }
    }

    //=====================================================================================
    // Quote of the day
    //=====================================================================================

    /// Recompute the featured quote for `date` from the full quote set.
    pub async fn load_quote_of_day(&mut self, date: NaiveDate) {
        match self.store.fetch_all_quotes().await {
            Ok(quotes) => {
                self.quote_of_day = quote_of_day::pick(date, &quotes).cloned();
            }
            Err(err) => warn!("Quote-of-the-day fetch failed: {err}"),
        }
    }

    //=====================================================================================
    // Lifecycle
    //=====================================================================================

    /// Initial mount: feed, favorites and featured quote.
    pub async fn activate(&mut self) {
        self.refresh().await;
    }

    /// Pull-to-refresh: full reset plus favorite reconciliation plus a
    /// recomputed featured quote.
    pub async fn refresh(&mut self) {
        self.reset_and_reload().await;
        self.reload_favorites().await;
        self.load_quote_of_day(Utc::now().date_naive()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Session, User};
    use crate::ports::{PortError, PortResult, SessionStream};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use futures::stream;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StubIdentity {
        user: Option<User>,
    }

    impl StubIdentity {
        fn signed_in() -> Self {
            Self {
                user: Some(User {
                    id: Uuid::new_v4(),
                    email: Some("reader@vault.test".to_string()),
                }),
            }
        }

        fn signed_out() -> Self {
            Self { user: None }
        }
    }

    #[async_trait]
    impl IdentityService for StubIdentity {
        async fn current_session(&self) -> PortResult<Option<Session>> {
            Ok(self.user.as_ref().map(|u| Session {
                user_id: u.id,
                email: u.email.clone(),
                access_token: "token".to_string(),
            }))
        }

        async fn current_user(&self) -> PortResult<Option<User>> {
            Ok(self.user.clone())
        }

        fn session_changes(&self) -> SessionStream {
            Box::pin(stream::pending())
        }

        async fn sign_in_with_password(&self, _: &str, _: &str) -> PortResult<()> {
            Ok(())
        }

        async fn sign_up(&self, _: &str, _: &str) -> PortResult<()> {
            Ok(())
        }

        async fn sign_out(&self) -> PortResult<()> {
            Ok(())
        }

        async fn reset_password_for_email(&self, _: &str) -> PortResult<()> {
            Ok(())
        }
    }

    /// A quote store over a fixed dataset that records every page request
    /// and can be told to fail.
    #[derive(Default)]
    struct FakeStore {
        quotes: Vec<Quote>,
        favorites: Mutex<Vec<(Uuid, QuoteId)>>,
        page_requests: Mutex<Vec<(FeedFilter, PageRange)>>,
        fail_fetches: bool,
    }

    impl FakeStore {
        fn with_quotes(count: usize) -> Self {
            Self {
                quotes: (0..count as i64).map(quote).collect(),
                ..Default::default()
            }
        }

        fn requests(&self) -> Vec<(FeedFilter, PageRange)> {
            self.page_requests.lock().unwrap().clone()
        }
    }

    fn quote(id: i64) -> Quote {
        Quote {
            id,
            text: format!("quote {id}"),
            author: format!("author {id}"),
            category: Category::Motivation,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[async_trait]
    impl QuoteStore for FakeStore {
        async fn fetch_quotes(
            &self,
            filter: &FeedFilter,
            range: PageRange,
        ) -> PortResult<Vec<Quote>> {
            self.page_requests
                .lock()
                .unwrap()
                .push((filter.clone(), range));
            if self.fail_fetches {
                return Err(PortError::Unexpected("network down".to_string()));
            }
            let from = range.from.min(self.quotes.len());
            let to = (range.to + 1).min(self.quotes.len());
            Ok(self.quotes[from..to].to_vec())
        }

        async fn fetch_all_quotes(&self) -> PortResult<Vec<Quote>> {
            if self.fail_fetches {
                return Err(PortError::Unexpected("network down".to_string()));
            }
            Ok(self.quotes.clone())
        }

        async fn favorite_ids(&self, user_id: Uuid) -> PortResult<Vec<QuoteId>> {
            Ok(self
                .favorites
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| *u == user_id)
                .map(|(_, q)| *q)
                .collect())
        }

        async fn favorite_quotes(&self, _user_id: Uuid) -> PortResult<Vec<Quote>> {
            Ok(Vec::new())
        }

        async fn add_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()> {
            self.favorites.lock().unwrap().push((user_id, quote_id));
            Ok(())
        }

        async fn remove_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()> {
            self.favorites
                .lock()
                .unwrap()
                .retain(|(u, q)| !(*u == user_id && *q == quote_id));
            Ok(())
        }

        async fn fetch_profile(&self, _user_id: Uuid) -> PortResult<Option<crate::domain::Profile>> {
            Ok(None)
        }

        async fn upsert_profile(&self, _profile: &crate::domain::Profile) -> PortResult<()> {
            Ok(())
        }
    }

    fn feed_over(store: Arc<FakeStore>) -> QuoteFeed {
        QuoteFeed::with_page_size(Arc::new(StubIdentity::signed_in()), store, 10)
    }

    #[tokio::test]
    async fn pages_accumulate_until_a_short_window() {
        // 23 quotes at page size 10: two full pages, then a short one.
        let store = Arc::new(FakeStore::with_quotes(23));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 10);
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());

        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 20);
        assert_eq!(feed.page(), 2);
        assert!(feed.has_more());

        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 23);
        assert_eq!(feed.page(), 3);
        assert!(!feed.has_more());

        // Exhausted: further calls issue no request and change nothing.
        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 23);
        assert_eq!(store.requests().len(), 3);
    }

    #[tokio::test]
    async fn windows_are_monotonic_and_non_overlapping() {
        let store = Arc::new(FakeStore::with_quotes(30));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        feed.load_next_page().await;

        let requests = store.requests();
        assert_eq!(requests[0].1, PageRange { from: 0, to: 9 });
        assert_eq!(requests[1].1, PageRange { from: 10, to: 19 });
    }

    #[tokio::test]
    async fn reset_discards_accumulation_and_starts_at_page_zero() {
        let store = Arc::new(FakeStore::with_quotes(30));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 20);

        feed.reset_and_reload().await;
        assert_eq!(feed.quotes().len(), 10);
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());
        assert_eq!(
            store.requests().last().unwrap().1,
            PageRange { from: 0, to: 9 }
        );
    }

    #[tokio::test]
    async fn filter_changes_trigger_a_full_reset() {
        let store = Arc::new(FakeStore::with_quotes(30));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        feed.set_category(CategoryFilter::Only(Category::Motivation))
            .await;

        let last = store.requests().last().unwrap().clone();
        assert_eq!(
            last.0.category,
            CategoryFilter::Only(Category::Motivation)
        );
        assert_eq!(last.1, PageRange { from: 0, to: 9 });
        assert_eq!(feed.page(), 1);
    }

    #[tokio::test]
    async fn back_to_back_filter_changes_leave_only_the_last_reload() {
        let store = Arc::new(FakeStore::with_quotes(30));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        feed.set_search("hope").await;
        feed.set_search("courage").await;

        // Each reload ran to completion before the next; the final state
        // reflects only the last filter and a single page-0 window.
        assert_eq!(feed.filter().search_term(), Some("courage"));
        assert_eq!(feed.quotes().len(), 10);
        assert_eq!(feed.page(), 1);

        let requests = store.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].0.search_term(), Some("courage"));
        assert_eq!(requests[2].1, PageRange { from: 0, to: 9 });
    }

    #[tokio::test]
    async fn zero_page_size_is_clamped_to_one() {
        let store = Arc::new(FakeStore::with_quotes(3));
        let mut feed =
            QuoteFeed::with_page_size(Arc::new(StubIdentity::signed_in()), store.clone(), 0);

        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 1);
        assert!(feed.has_more());
        assert_eq!(
            store.requests().last().unwrap().1,
            PageRange { from: 0, to: 0 }
        );
    }

    #[tokio::test]
    async fn whitespace_search_issues_the_same_query_as_no_search() {
        let store = Arc::new(FakeStore::with_quotes(5));
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        feed.set_search("   ").await;

        let requests = store.requests();
        assert_eq!(requests[0].0.search_term(), None);
        assert_eq!(requests[1].0.search_term(), None);
    }

    #[tokio::test]
    async fn motivation_life_page_zero_scenario() {
        let store = Arc::new(FakeStore::with_quotes(5));
        let mut feed = feed_over(store.clone());

        feed.filter.category = CategoryFilter::Only(Category::Motivation);
        feed.filter.search = "life".to_string();
        feed.reset_and_reload().await;

        let (filter, range) = store.requests().pop().unwrap();
        assert_eq!(filter.category, CategoryFilter::Only(Category::Motivation));
        assert_eq!(filter.search_term(), Some("life"));
        assert_eq!(range, PageRange { from: 0, to: 9 });
    }

    #[tokio::test]
    async fn failed_fetch_leaves_pagination_state_untouched() {
        let store = Arc::new(FakeStore {
            fail_fetches: true,
            ..FakeStore::with_quotes(30)
        });
        let mut feed = feed_over(store.clone());

        feed.load_next_page().await;
        assert_eq!(feed.quotes().len(), 0);
        assert_eq!(feed.page(), 0);
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn toggle_favorite_is_its_own_inverse() {
        let store = Arc::new(FakeStore::with_quotes(3));
        let mut feed = feed_over(store.clone());

        assert!(!feed.is_favorite(2));
        feed.toggle_favorite(2).await;
        assert!(feed.is_favorite(2));
        feed.toggle_favorite(2).await;
        assert!(!feed.is_favorite(2));
        assert!(store.favorites.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_without_a_user_is_a_no_op() {
        let store = Arc::new(FakeStore::with_quotes(3));
        let mut feed =
            QuoteFeed::with_page_size(Arc::new(StubIdentity::signed_out()), store.clone(), 10);

        feed.toggle_favorite(1).await;
        assert!(!feed.is_favorite(1));
        assert!(store.favorites.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reload_favorites_replaces_the_local_set() {
        let identity = Arc::new(StubIdentity::signed_in());
        let user_id = identity.user.as_ref().unwrap().id;
        let store = Arc::new(FakeStore::with_quotes(5));
        store.favorites.lock().unwrap().push((user_id, 4));

        let mut feed = QuoteFeed::with_page_size(identity, store, 10);
        feed.favorites.insert(1); // locally diverged
        feed.reload_favorites().await;

        assert!(feed.is_favorite(4));
        assert!(!feed.is_favorite(1));
    }

    #[tokio::test]
    async fn quote_of_day_uses_the_date_digit_sum() {
        let store = Arc::new(FakeStore::with_quotes(7));
        let mut feed = feed_over(store.clone());

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        feed.load_quote_of_day(date).await;

        // digit sum 15, 15 mod 7 = 1
        assert_eq!(feed.quote_of_day(), Some(&store.quotes[1]));
    }
}
