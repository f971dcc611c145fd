use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Turn proxy share links into engine outbound configs", long_about = None)]
pub struct Args {
    #[arg(short, long, global = true, help = "Emit trace log")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported share-link schemes
    Schemes,

    /// Parse share links and print their outbound JSON
    Parse {
        #[arg(help = "Share links (vless://, vmess://, ss://)")]
        uris: Vec<String>,

        #[arg(short, long, help = "File with one share link per line")]
        file: Option<PathBuf>,
    },

    /// Build a complete engine config around one share link
    Render {
        #[arg(help = "Share link")]
        uri: String,

        #[arg(short, long, help = "Core options TOML file")]
        config: Option<PathBuf>,

        #[arg(short, long, help = "Config output path, stdout if omitted")]
        output: Option<PathBuf>,
    },
}
