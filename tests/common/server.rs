//! Test server management.
//!
//! Spawns and manages `slircd` instances for integration testing.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;

use tokio::time::sleep;

/// A test server instance, backed by a real `slircd` child process listening
/// on a plain-TCP port and writing its MOTD/state/log files under a
/// throwaway temp directory.
pub struct TestServer {
    child: Child,
    port: u16,
    data_dir: PathBuf,
}

impl TestServer {
    /// Spawn a new test server listening on `127.0.0.1:<port>`.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = std::env::temp_dir().join(format!("slircd-test-{port}"));
        std::fs::create_dir_all(&data_dir)?;

        let motd_path = data_dir.join("motd.txt");
        std::fs::write(&motd_path, "Welcome to the test network.\n")?;

        let config_path = data_dir.join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.server"
network = "TestNet"

[[listen]]
address = "127.0.0.1:{port}"

[motd]
file = "{motd}"

[liveness]
ping_threshold_secs = 3600
timeout_secs = 7200
sweep_interval_secs = 3600
"#,
            motd = motd_path.display(),
        );
        std::fs::write(&config_path, config_content)?;

        let binary_path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/debug/slircd");

        let child = Command::new(&binary_path)
            .arg("--config")
            .arg(&config_path)
            .spawn()?;

        let server = Self { child, port, data_dir };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Spawn a new test server that requires a connection password.
    pub async fn spawn_with_password(port: u16, password: &str) -> anyhow::Result<Self> {
        let data_dir = std::env::temp_dir().join(format!("slircd-test-{port}"));
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.server"
network = "TestNet"
password = "{password}"

[[listen]]
address = "127.0.0.1:{port}"
"#
        );
        std::fs::write(&config_path, config_content)?;

        let binary_path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/debug/slircd");

        let child = Command::new(&binary_path)
            .arg("--config")
            .arg(&config_path)
            .spawn()?;

        let server = Self { child, port, data_dir };
        server.wait_until_ready().await?;
        Ok(server)
    }

    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port)).await.is_ok() {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server failed to start within 3 seconds")
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
