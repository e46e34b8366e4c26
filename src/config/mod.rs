pub mod schema;

pub use schema::{ClientConfig, Config, GatewayConfig, GitHubConfig, StoreConfig};
