//! Live running-config retrieval over SSH.

use ssh2::Session;
use std::io::Read;
use std::net::TcpStream;
use std::time::Duration;
use thiserror::Error;

/// Named failures of a live-device command session. The caller turns each
/// variant into a distinct user-facing message.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("connection timed out: {0}")]
    Timeout(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("{0}")]
    Failed(String),
}

/// A collaborator that returns a device's raw running configuration
pub trait RunningConfigSource {
    fn fetch_running_config(&self, host: &str) -> Result<String, RetrievalError>;
}

/// Keyboard-interactive prompt handler that always responds with the password
struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// SSH-backed retrieval running a single show command per fetch.
/// Authenticates with password first, then keyboard-interactive (needed for
/// Arista EOS and similar). Blocking; every call opens a fresh session.
pub struct SshSource {
    username: String,
    password: String,
    timeout_secs: u64,
    command: String,
}

impl SshSource {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        timeout_secs: u64,
        command: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            timeout_secs,
            command: command.into(),
        }
    }

    fn connect(&self, host: &str) -> Result<Session, RetrievalError> {
        let addr = format!("{}:22", host);
        let sock_addr = addr
            .parse()
            .map_err(|err| RetrievalError::Failed(format!("invalid address {}: {}", addr, err)))?;

        let tcp = TcpStream::connect_timeout(&sock_addr, Duration::from_secs(self.timeout_secs))
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                    RetrievalError::Timeout(format!("no TCP response from {}", addr))
                }
                _ => RetrievalError::Failed(format!("TCP connection failed: {}", err)),
            })?;

        tcp.set_read_timeout(Some(Duration::from_secs(self.timeout_secs)))
            .ok();
        tcp.set_write_timeout(Some(Duration::from_secs(self.timeout_secs)))
            .ok();

        let mut session = Session::new()
            .map_err(|err| RetrievalError::Failed(format!("failed to create SSH session: {}", err)))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(self.timeout_secs as u32 * 1000);
        session
            .handshake()
            .map_err(|err| RetrievalError::Failed(format!("SSH handshake failed: {}", err)))?;

        // Try password auth first
        match session.userauth_password(&self.username, &self.password) {
            Ok(_) if session.authenticated() => return Ok(session),
            _ => {}
        }

        // Fall back to keyboard-interactive auth
        let mut prompter = PasswordPrompt {
            password: self.password.clone(),
        };
        let _ = session.userauth_keyboard_interactive(&self.username, &mut prompter);

        if session.authenticated() {
            Ok(session)
        } else {
            Err(RetrievalError::Auth(
                "all authentication methods exhausted".to_string(),
            ))
        }
    }
}

impl RunningConfigSource for SshSource {
    fn fetch_running_config(&self, host: &str) -> Result<String, RetrievalError> {
        let session = self.connect(host)?;

        let mut channel = session
            .channel_session()
            .map_err(|err| RetrievalError::Failed(format!("failed to open channel: {}", err)))?;
        channel
            .exec(&self.command)
            .map_err(|err| RetrievalError::Failed(format!("failed to execute command: {}", err)))?;

        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                    RetrievalError::Timeout(format!("no output from {}", host))
                }
                _ => RetrievalError::Failed(format!("failed to read output: {}", err)),
            })?;

        channel
            .wait_close()
            .map_err(|err| RetrievalError::Failed(format!("failed to close channel: {}", err)))?;

        Ok(output)
    }
}
