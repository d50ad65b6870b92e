pub mod criteria;
pub mod feed;
pub mod filter;
pub mod query;

pub use criteria::{Criteria, Selection, SortKey};
pub use feed::ListingFeed;
pub use filter::apply;
