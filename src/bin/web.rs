use clap::Parser;
use contact_sheet::app;
use contact_sheet::config::{BIND_ENV, DATA_DIR_ENV, DEFAULT_BIND, resolve_data_dir};
use contact_sheet::controller::Controller;
use contact_sheet::share::NoShare;
use contact_sheet::store::RecordStore;
use std::path::PathBuf;

/// Serve the contact form API over HTTP
#[derive(Parser)]
#[command(name = "web")]
struct Args {
    /// Directory holding data.xlsx
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = BIND_ENV, default_value = DEFAULT_BIND)]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let data_dir = resolve_data_dir(args.data_dir.as_deref())?;
    log::info!("Starting web server with data in {}", data_dir.display());

    // Clients download the workbook from /api/export instead
    let controller = Controller::new(RecordStore::new(&data_dir), Box::new(NoShare));
    app::run(controller, &args.bind).await
}
