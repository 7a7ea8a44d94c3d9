use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use supportdesk::core::config::{self, CliOverrides, SupportConfig};

#[derive(Parser)]
#[command(name = "supportdesk", about = "Terminal client for the AI customer support backend")]
struct Args {
    /// Backend base URL (e.g. http://localhost:8000)
    #[arg(long)]
    base_url: Option<String>,

    /// Conversation id sent with every message
    #[arg(long)]
    conversation_id: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        SupportConfig::default()
    });
    let config = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            conversation_id: args.conversation_id,
        },
    );

    // The terminal belongs to the UI, so logs go to a file
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("supportdesk.log") {
        let _ = WriteLogger::init(config.level_filter(), log_config, log_file);
    }

    log::info!(
        "supportdesk starting up: base_url={}, conversation_id={}",
        config.base_url,
        config.conversation_id
    );

    supportdesk::tui::run(config)
}
