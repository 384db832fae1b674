pub mod identity;
pub mod wait_reason;

pub use identity::ChunkId;
pub use wait_reason::{DOWNLOAD_WAIT_REASONS, UPLOAD_WAIT_REASONS, WaitReason};
