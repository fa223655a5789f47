//! src/domain/mod.rs
mod registry;
pub use registry::Registry;

mod subscriber;
pub use subscriber::{NewSubscriber, Subscriber};

mod subscriber_email;
pub use subscriber_email::Error as EmailError;
pub use subscriber_email::SubscriberEmail;
