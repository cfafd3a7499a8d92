use std::net::Ipv4Addr;
use std::path::PathBuf;

const STATUS_API_PORT: &str = "STATUS_API_PORT";

const DEFAULT_PORT: u16 = 3001;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(STATUS_API_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const STATUS_API_ADDR: &str = "STATUS_API_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> Ipv4Addr {
    let addr_from_env = std::env::var(STATUS_API_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

const STATUS_PATH: &str = "STATUS_PATH";

pub const DEFAULT_SNAPSHOT_PATH: &str = "./status.json";

pub fn get_snapshot_path() -> PathBuf {
    std::env::var(STATUS_PATH).map_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH), PathBuf::from)
}
