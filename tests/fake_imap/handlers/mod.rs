//! IMAP command handlers for the fake server.
//!
//! Read-only handlers (LIST, SELECT/EXAMINE, UID SEARCH, UID FETCH)
//! take a `Mailbox` snapshot; the rest lock the shared mailbox to
//! mutate it.

mod session;
mod uid_fetch;

pub use expunge::{handle_close, handle_expunge};
pub use list::handle_list;
pub use manage::{handle_create, handle_delete};
pub use select::handle_select;
pub use session::{handle_capability, handle_login, handle_logout, handle_noop};
pub use uid_copy::handle_uid_copy;
pub use uid_fetch::handle_uid_fetch;
pub use uid_search::handle_uid_search;
pub use uid_store::{StoreArgs, handle_uid_store};
