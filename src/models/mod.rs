pub mod accessory;
pub mod address;
pub mod event;
pub mod event_pass;
pub mod listing;
pub mod moment;
pub mod pagination;
pub mod social;
pub mod user;

pub use accessory::Accessory;
pub use address::FlowAddress;
pub use event::{Event, EventStatus};
pub use event_pass::EventPass;
pub use listing::{ListedNft, Listing};
pub use moment::Moment;
pub use pagination::{Envelope, Page, Pagination};
pub use social::Comment;
pub use user::{UserProfile, UserSummary};

/// Backend иногда отдаёт строки картинок в кавычках или с ведущими слэшами.
pub fn clean_image_url(url: &str) -> String {
    url.trim_matches('"').trim_start_matches('/').to_string()
}
