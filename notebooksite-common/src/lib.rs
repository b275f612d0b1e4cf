pub mod config;

pub use config::{PullTarget, SiteConfig};
