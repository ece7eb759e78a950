pub mod identity;
pub mod store;

pub use identity::HttpIdentityAdapter;
pub use store::HttpQuoteStore;
