pub mod api_key;
pub mod board;
pub mod clipboard;
pub mod copy;
pub mod dashboard;
pub mod edit;
pub mod error;
pub mod notify;
pub mod plan;
pub mod registry;
pub mod seed;
pub mod task;

pub use api_key::{ApiKey, LastUsed};
pub use board::{Column, KanbanView};
pub use clipboard::Clipboard;
pub use dashboard::{Dashboard, DashboardConfig};
pub use error::{ClipboardError, DashboardError};
pub use notify::{Notification, NotificationKind, Notifier};
pub use registry::ApiKeyRegistry;
pub use task::{Status, Task};
