//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use datamgr::config::ServiceConfig;
use datamgr::pipeline::DirectoryPolicy;
use datamgr::{compile, HttpServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The `/signup` schema used across scenarios.
#[allow(dead_code)]
pub const SIGNUP_SCHEMA: &str = r#"
receive:
  /signup:
    fields:
      name: { type: string, required: true }
      joined_at: { generate: timestamp }
      subscribed: { type: bool }
      source: { internal: true, value: web }
    create_file:
      name: 'out/{{ field "name" }}.yaml'
"#;

/// A datamgr instance on an ephemeral port writing under a temp directory.
pub struct TestServer {
    pub addr: SocketAddr,
    root: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub async fn start(schema: &str) -> Self {
        Self::start_with_policy(schema, DirectoryPolicy::Parent).await
    }

    #[allow(dead_code)]
    pub async fn start_with_policy(schema: &str, policy: DirectoryPolicy) -> Self {
        let root = TempDir::new().unwrap();
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.output.root = root.path().to_path_buf();
        config.output.directory_policy = policy;

        let schema = compile(schema.as_bytes()).expect("test schema must compile");
        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(config, schema);
        let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

        Self {
            addr,
            root,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    #[allow(dead_code)]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    #[allow(dead_code)]
    pub fn output(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Trigger graceful shutdown and wait for the server to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
