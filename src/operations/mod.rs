pub mod claim;
pub mod query;
pub mod read;
pub mod write;

pub use claim::auto_claim;
pub use query::{pending_entry, stream_exists};
pub use read::{read_new, read_pending};
pub use write::{ack, create_group};
