//! services/app/src/adapters/store.rs
//!
//! This module contains the quote store adapter, which is the concrete
//! implementation of the `QuoteStore` port from the `core` crate. It issues
//! PostgREST-style requests against the hosted backend's `quotes`,
//! `favorites` and `profiles` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use quotevault_core::domain::{
    CategoryFilter, FeedFilter, PageRange, Profile, Quote, QuoteId, Session,
};
use quotevault_core::ports::{PortError, PortResult, QuoteStore};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A quote store adapter over the backend's REST data API.
pub struct HttpQuoteStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// The session observed from the identity adapter; its access token
    /// authorizes data requests when present.
    sessions: watch::Receiver<Option<Session>>,
}

impl HttpQuoteStore {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: String,
        sessions: watch::Receiver<Option<Session>>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            sessions,
        }
    }

    fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// A request against `table` carrying the api key and, when a session is
    /// live, its bearer token.
    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        let bearer = self
            .sessions
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| self.api_key.clone());
        self.http
            .request(method, self.table_endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }
}

//=========================================================================================
// Query Building (pure, unit-tested)
//=========================================================================================

/// Parameters for the paginated, filtered quote listing.
///
/// Ordering is strictly `created_at` descending; ties keep whatever
/// stability the backend's sort provides.
fn quote_listing_params(filter: &FeedFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
    ];
    if let CategoryFilter::Only(category) = filter.category {
        params.push(("category", format!("eq.{category}")));
    }
    if let Some(term) = filter.search_term() {
        params.push(("or", format!("(quote.ilike.*{term}*,author.ilike.*{term}*)")));
    }
    params
}

/// The `Range` header value for an inclusive row window.
fn range_value(range: PageRange) -> String {
    format!("{}-{}", range.from, range.to)
}

//=========================================================================================
// "Impure" Table Row Structs
//=========================================================================================

#[derive(Deserialize)]
struct QuoteRow {
    id: QuoteId,
    quote: String,
    author: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl QuoteRow {
    /// Malformed rows (unknown category) are logged and skipped rather than
    /// propagated inward.
    fn to_domain(self) -> Option<Quote> {
        match self.category.parse() {
            Ok(category) => Some(Quote {
                id: self.id,
                text: self.quote,
                author: self.author,
                category,
                created_at: self.created_at,
            }),
            Err(err) => {
                warn!("Skipping malformed quote row {}: {err}", self.id);
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct FavoriteIdRow {
    quote_id: QuoteId,
}

/// A favorites row with its join projection onto `quotes`. The projection
/// can be null if the quote was deleted out from under the favorite.
#[derive(Deserialize)]
struct FavoriteJoinRow {
    quotes: Option<QuoteRow>,
}

#[derive(Serialize)]
struct NewFavoriteRow {
    user_id: Uuid,
    quote_id: QuoteId,
}

#[derive(Serialize, Deserialize)]
struct ProfileRow {
    id: Uuid,
    name: Option<String>,
    avatar_url: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl ProfileRow {
    fn to_domain(self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.unwrap_or_default(),
            avatar_url: self.avatar_url.unwrap_or_default(),
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

//=========================================================================================
// Response Helpers
//=========================================================================================

fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Unexpected(err.to_string())
}

async fn expect_rows<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> PortResult<Vec<T>> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(PortError::Unauthorized);
    }
    if !status.is_success() {
        return Err(PortError::Unexpected(format!(
            "{what} request returned {status}"
        )));
    }
    response.json::<Vec<T>>().await.map_err(transport_error)
}

async fn expect_ok(response: reqwest::Response, what: &str) -> PortResult<()> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(PortError::Unauthorized);
    }
    if !status.is_success() {
        return Err(PortError::Unexpected(format!(
            "{what} request returned {status}"
        )));
    }
    Ok(())
}

//=========================================================================================
// `QuoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuoteStore for HttpQuoteStore {
    async fn fetch_quotes(&self, filter: &FeedFilter, range: PageRange) -> PortResult<Vec<Quote>> {
        let response = self
            .request(reqwest::Method::GET, "quotes")
            .query(&quote_listing_params(filter))
            .header("Range-Unit", "items")
            .header("Range", range_value(range))
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<QuoteRow> = expect_rows(response, "quote listing").await?;
        Ok(rows.into_iter().filter_map(QuoteRow::to_domain).collect())
    }

    async fn fetch_all_quotes(&self) -> PortResult<Vec<Quote>> {
        let response = self
            .request(reqwest::Method::GET, "quotes")
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<QuoteRow> = expect_rows(response, "full quote set").await?;
        Ok(rows.into_iter().filter_map(QuoteRow::to_domain).collect())
    }

    async fn favorite_ids(&self, user_id: Uuid) -> PortResult<Vec<QuoteId>> {
        let response = self
            .request(reqwest::Method::GET, "favorites")
            .query(&[
                ("select", "quote_id".to_string()),
                ("user_id", format!("eq.{user_id}")),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<FavoriteIdRow> = expect_rows(response, "favorite ids").await?;
        Ok(rows.into_iter().map(|row| row.quote_id).collect())
    }

    async fn favorite_quotes(&self, user_id: Uuid) -> PortResult<Vec<Quote>> {
        let response = self
            .request(reqwest::Method::GET, "favorites")
            .query(&[
                (
                    "select",
                    "id,created_at,quotes(id,quote,author,category,created_at)".to_string(),
                ),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<FavoriteJoinRow> = expect_rows(response, "favorite quotes").await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.quotes.and_then(QuoteRow::to_domain))
            .collect())
    }

    async fn add_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()> {
        let response = self
            .request(reqwest::Method::POST, "favorites")
            .header("Prefer", "return=minimal")
            .json(&NewFavoriteRow { user_id, quote_id })
            .send()
            .await
            .map_err(transport_error)?;
        expect_ok(response, "favorite insert").await
    }

    async fn remove_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, "favorites")
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("quote_id", format!("eq.{quote_id}")),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        expect_ok(response, "favorite delete").await
    }

    async fn fetch_profile(&self, user_id: Uuid) -> PortResult<Option<Profile>> {
        let response = self
            .request(reqwest::Method::GET, "profiles")
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{user_id}")),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<ProfileRow> = expect_rows(response, "profile").await?;
        Ok(rows.into_iter().next().map(ProfileRow::to_domain))
    }

    async fn upsert_profile(&self, profile: &Profile) -> PortResult<()> {
        let row = ProfileRow {
            id: profile.id,
            name: Some(profile.name.clone()),
            avatar_url: Some(profile.avatar_url.clone()),
            updated_at: Some(profile.updated_at),
        };
        let response = self
            .request(reqwest::Method::POST, "profiles")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;
        expect_ok(response, "profile upsert").await
    }
}
