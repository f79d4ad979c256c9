pub mod notification;
pub mod report;

pub use notification::{NotificationDispatcher, NotificationOutcome, WebhookPayload};
pub use report::{success_rate, ReportGenerator};
