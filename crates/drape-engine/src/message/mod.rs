//! Cross-thread message plumbing.
//!
//! - `mailbox`: single-consumer inbound queue with an explicit close signal
//! - `commutator`: role-addressed registry used to post to another thread
//! - `render` / `upload`: the closed message sets each thread understands
//!
//! Payload ownership moves into the queue at post time; the sender keeps no
//! handle to it afterwards.

mod commutator;
mod mailbox;
mod render;
mod upload;

pub use commutator::{ThreadRole, ThreadsCommutator};
pub use mailbox::{mailbox, Mailbox, MailboxCloser, Poster};
pub use render::RenderMessage;
pub use upload::UploadMessage;
