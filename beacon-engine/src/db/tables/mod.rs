pub mod events;
pub mod kv;

pub use events::{STORED_EVENTS_CAP, STORED_EVENTS_KEY};
pub use kv::{PAGE_VIEWS_KEY, SESSION_ID_KEY, VARIANT_KEY};
