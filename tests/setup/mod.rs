use usergql::engine::schema::static_user;
use usergql::{Client, Configuration, Engine, RunningServer, Server};

#[allow(dead_code)]
pub(crate) fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Loopback listener on an ephemeral port, so tests never collide with each other or with a
/// service running on port 4000
pub(crate) fn test_config() -> Configuration {
    Configuration::from_file("tests/fixtures/config.yml")
        .expect("Could not load test configuration file.")
}

pub(crate) fn test_server(config: Configuration) -> RunningServer {
    Server::new(config, Engine::new(static_user()))
        .bind()
        .expect("Expected test server to bind.")
}

#[allow(dead_code)]
pub(crate) fn test_client(server: &RunningServer) -> Client {
    Client::new_with_http(server.url(), None).expect("Expected HTTP client.")
}
