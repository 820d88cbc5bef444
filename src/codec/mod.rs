pub mod attachment;
pub mod record;

pub use attachment::WireAttachment;
pub use record::{MessageRecord, WireAlternative, deserialize, from_json, from_value, serialize};
