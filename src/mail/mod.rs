pub mod attachment;
pub mod markdown;
pub mod message;
pub mod mime;

pub use attachment::{Attachment, AttachmentContent, DecodedPart, MimePart};
pub use message::{AlternativePart, EmailMessage, MessageBody, Subtypes};
