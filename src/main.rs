use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use scale_ruler::config;
use scale_ruler::gui::app::AppModel;
use scale_ruler::ruler::Ruler;
use scale_ruler::sys::runtime;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Value to select on startup, overriding `initial_value` from the config
    #[arg(short, long, allow_negative_numbers = true)]
    value: Option<i32>,

    /// Step through every value of the range after startup
    #[arg(long)]
    sweep: bool,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.init_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default();
    if let Some(value) = args.value {
        config.ruler.initial_value = Some(value);
    }

    let ruler = Ruler::new(config.ruler).context("Invalid ruler configuration")?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("io.github.scaleruler.Ruler").with_args(Vec::new());
    app.run::<AppModel>((ruler, config.sweep, args.sweep, rx));

    Ok(())
}
