mod protocol;
mod service;
mod transport;

pub use protocol::{DapMessage, DapMessageContent};
pub use service::StdioDebugService;
pub use transport::{DapReader, DapWriter, MAX_CONTENT_LENGTH};
