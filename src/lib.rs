pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod oauth;
pub mod params;
pub mod resources;
pub mod urls;

pub use client::Ya360Client;
pub use config::{ConfigStore, Endpoints, FileConfigStore, MemoryConfigStore};
pub use error::Ya360Error;
pub use fetch::{Page, PageSet, PaginatedFetcher};
pub use oauth::{AuthStatus, ClientCredentials, TokenManager, TokenState};
pub use params::{OrderBy, RequestParams};
pub use resources::Listing;
