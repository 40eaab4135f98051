pub mod http_mock;

use wiremock::MockServer;
use ya360::{ClientCredentials, Endpoints, MemoryConfigStore, TokenManager, Ya360Client};

/// Endpoints with both the API and the OAuth server on the mock.
#[allow(dead_code)]
pub fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::new(&server.uri(), &server.uri())
}

/// Credentials carrying the verification code `code1`.
#[allow(dead_code)]
pub fn credentials() -> ClientCredentials {
    ClientCredentials::new("abc", "xyz").with_verification_code("code1")
}

/// Unauthenticated client with an in-memory store, pointed at the mock.
#[allow(dead_code)]
pub fn client(server: &MockServer) -> Ya360Client {
    let auth = TokenManager::new(credentials(), Box::new(MemoryConfigStore::new()));
    Ya360Client::with_endpoints(auth, &endpoints(server)).unwrap()
}

/// Client that has already exchanged `code1` for `tok1`.
#[allow(dead_code)]
pub async fn authenticated_client(server: &MockServer) -> Ya360Client {
    http_mock::mount_token(server, http_mock::token_body("tok1", "ref1")).await;
    let mut client = client(server);
    client.start().await.unwrap();
    client
}

/// Temp directory holding a `ya360.toml` with the given contents.
#[allow(dead_code)]
pub fn temp_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ya360.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
