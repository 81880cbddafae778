use clap::Parser;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8003;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Port to listen on
    #[arg(env = "FLAPPY_PORT")]
    pub port: Option<String>,

    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Remove a host's room and a client's name when their connection ends
    #[arg(long, env = "FLAPPY_CLEANUP_ON_CLOSE")]
    pub cleanup_on_close: bool,
}

impl Args {
    pub fn port(&self) -> u16 {
        let Some(raw) = self.port.as_deref() else {
            return DEFAULT_PORT;
        };

        parse_port(raw).unwrap_or_else(|| {
            warn!("invalid port {raw:?}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        })
    }
}

/// Accepts a non-zero port, ignoring surrounding whitespace.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}
