/// Sidechat - floating chat widget core
///
/// A REST-backed chat widget: peer directory, conversation selection,
/// optimistic local echo, and fire-and-forget message delivery.

pub mod api;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod widget;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ChatError, Result};
pub use widget::ChatWidget;
