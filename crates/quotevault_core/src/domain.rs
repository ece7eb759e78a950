//! crates/quotevault_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any backend wire format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable integer id of a quote record.
pub type QuoteId = i64;

/// An authenticated session as observed from the identity provider.
///
/// The token is opaque to everything but the identity adapter; the
/// navigation gate only cares about presence or absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
}

/// A single quote record. Immutable from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub author: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// The fixed set of categories a quote can be stored under.
///
/// "All" is deliberately not a variant here: it is a filter sentinel,
/// never a stored value. See [`CategoryFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Motivation,
    Love,
    Success,
    Wisdom,
    Humor,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Motivation,
        Category::Love,
        Category::Success,
        Category::Wisdom,
        Category::Humor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Motivation => "Motivation",
            Category::Love => "Love",
            Category::Success => "Success",
            Category::Wisdom => "Wisdom",
            Category::Humor => "Humor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored category string is not one of the known set.
#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Motivation" => Ok(Category::Motivation),
            "Love" => Ok(Category::Love),
            "Success" => Ok(Category::Success),
            "Wisdom" => Ok(Category::Wisdom),
            "Humor" => Ok(Category::Humor),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// The category tab the user has selected in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(cat) => cat.as_str(),
        }
    }
}

/// The active filter pair of the quote feed: category tab + free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedFilter {
    pub category: CategoryFilter,
    pub search: String,
}

impl FeedFilter {
    /// The effective search term, if any.
    ///
    /// Empty and whitespace-only text means "no search filter", not a
    /// literal empty-string match.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }
}

/// An inclusive row window into the ordered quote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: usize,
    pub to: usize,
}

impl PageRange {
    /// The window covering `page` (zero-based) at the given page size.
    ///
    /// The window is inclusive on both ends, so a size of zero cannot be
    /// represented; it is treated as one.
    pub fn for_page(page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let from = page * page_size;
        Self {
            from,
            to: from + page_size - 1,
        }
    }
}

/// A user's editable profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
    pub updated_at: DateTime<Utc>,
}
