use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "wordmatch")]
#[command(version, about = "Finds the closest known words to a text by value and lexical order", long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "HTTP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HTTP_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Newline-delimited word list, read at startup and rewritten on every new word
    #[arg(short, long, env = "WORDS_FILE", default_value = "words.txt")]
    pub words_file: PathBuf,

    /// Directory served for every path other than `/analyze`
    #[arg(short, long, env = "STATIC_DIR", default_value = "webroot")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
