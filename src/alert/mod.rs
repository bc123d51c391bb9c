// src/alert/mod.rs
mod dispatcher;
mod mail;
mod notifier;
mod record;
mod sms;

pub use dispatcher::{AlertDispatcher, AlertSink};
pub use mail::MailNotifier;
pub use notifier::{Delivery, LogNotifier, Notifier, NotifyError};
pub use record::{Alert, AlertCause, AlertMessage};
pub use sms::SmsNotifier;
