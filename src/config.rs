use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway_host: String,
    pub gateway_port: u16,
    /// JSON workbook on disk. `None` keeps the workbook in memory only.
    pub workbook_path: Option<PathBuf>,
    pub sheet_name: String,
    pub allowed_origins: AllowedOrigins,
    pub max_body_bytes: usize,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let gateway_host = env::var("GATEWAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let gateway_port = env::var("GATEWAY_PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        let workbook_path = env::var("WORKBOOK_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let sheet_name = env::var("SHEET_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Registry".to_string());

        let allowed_origins =
            parse_allowed_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .unwrap_or(65536);

        let log_dir = env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./logs"));

        Ok(Config {
            gateway_host,
            gateway_port,
            workbook_path,
            sheet_name,
            allowed_origins,
            max_body_bytes,
            log_dir,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.gateway_host, self.gateway_port);
        addr.parse().map_err(|e| anyhow::anyhow!("Invalid socket address: {}", e))
    }
}

fn parse_allowed_origins(raw: &str) -> AllowedOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}
