pub mod domain;
pub mod feed;
pub mod gate;
pub mod ports;
pub mod quote_of_day;

pub use domain::{
    Category, CategoryFilter, FeedFilter, PageRange, Profile, Quote, QuoteId, Session, User,
};
pub use feed::{QuoteFeed, DEFAULT_PAGE_SIZE};
pub use gate::{Screen, ScreenSet, SessionGate};
pub use ports::{IdentityService, PortError, PortResult, QuoteStore, SessionStream};
