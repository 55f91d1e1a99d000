use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub listen: ListenSection,
    #[serde(default)]
    pub status: StatusSection,
    #[serde(default)]
    pub kick: KickSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ListenSection {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Milliseconds a connection may stay open without producing a valid
    /// handshake before it is dropped.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
}

fn default_address() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    25565
}

fn default_handshake_timeout_ms() -> u64 {
    2000
}

impl Default for ListenSection {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusSection {
    /// Plain text or a chat-component JSON object.
    #[serde(default = "default_motd")]
    pub motd: String,
    #[serde(default)]
    pub protocol_name: String,
    #[serde(default)]
    pub protocol_version: i32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub online_players: u32,
    /// Path to a PNG file, or a pre-formed `data:` URI.
    #[serde(default)]
    pub favicon: Option<String>,
}

fn default_motd() -> String {
    "§eHello World!".into()
}

impl Default for StatusSection {
    fn default() -> Self {
        Self {
            motd: default_motd(),
            protocol_name: String::new(),
            protocol_version: 0,
            max_players: 0,
            online_players: 0,
            favicon: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KickSection {
    /// Plain text or a chat-component JSON object, shown to login attempts.
    #[serde(default = "default_kick_message")]
    pub message: String,
}

fn default_kick_message() -> String {
    "§cNot available".into()
}

impl Default for KickSection {
    fn default() -> Self {
        Self {
            message: default_kick_message(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load the configuration file. A missing file is not an error: the
    /// server runs fine on nothing but defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            [listen]
            address = "127.0.0.1"
            port = 25566
            handshake_timeout_ms = 500

            [status]
            motd = "A custom server"
            protocol_name = "1.20.1"
            protocol_version = 763
            max_players = 100
            online_players = 42
            favicon = "icon.png"

            [kick]
            message = "Down for maintenance"

            [logging]
            level = "debug"
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listen.address, "127.0.0.1");
        assert_eq!(config.listen.port, 25566);
        assert_eq!(config.listen.handshake_timeout_ms, 500);
        assert_eq!(config.status.motd, "A custom server");
        assert_eq!(config.status.protocol_name, "1.20.1");
        assert_eq!(config.status.protocol_version, 763);
        assert_eq!(config.status.max_players, 100);
        assert_eq!(config.status.online_players, 42);
        assert_eq!(config.status.favicon.as_deref(), Some("icon.png"));
        assert_eq!(config.kick.message, "Down for maintenance");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listen.address, "0.0.0.0");
        assert_eq!(config.listen.port, 25565);
        assert_eq!(config.listen.handshake_timeout_ms, 2000);
        assert_eq!(config.status.motd, "§eHello World!");
        assert_eq!(config.status.protocol_name, "");
        assert_eq!(config.status.protocol_version, 0);
        assert_eq!(config.status.max_players, 0);
        assert_eq!(config.status.online_players, 0);
        assert!(config.status.favicon.is_none());
        assert_eq!(config.kick.message, "§cNot available");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml_str = r#"
            [status]
            motd = "Hi"
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.status.motd, "Hi");
        assert_eq!(config.status.max_players, 0);
        assert_eq!(config.listen.port, 25565);
    }
}
