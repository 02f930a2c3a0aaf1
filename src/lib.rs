pub mod actors;
pub mod alerts;
pub mod config;
pub mod mailer;
pub mod rotation;
pub mod store;
pub mod uploader;
