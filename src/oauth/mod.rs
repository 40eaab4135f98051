pub mod credentials;
pub mod manager;
pub mod token;

pub use credentials::{ClientCredentials, CREDENTIALS_SECTION};
pub use manager::{AuthStatus, TokenManager};
pub use token::{authorize_url, exchange, Grant, TokenState, TOKEN_SECTION};
