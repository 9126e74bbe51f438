use clap::Parser;
use color_eyre::Result;
use lazymodal::dom::Size;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::page::Page;

mod app;
mod cli;
mod command;
mod config;
mod page;
mod theme;
mod tui;
mod view;

/// Terminal size assumed for `--dump` when stdout is not a terminal.
const DUMP_FALLBACK: (u16, u16) = (120, 40);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazymodal");

    let args = cli::Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config.modal);
    let theme = theme::theme_from_name(&config.theme.name);

    if args.dump {
        let (columns, rows) = crossterm::terminal::size().unwrap_or(DUMP_FALLBACK);
        let viewport = Size::new(
            f64::from(columns) * config.display.cell_width,
            f64::from(rows) * config.display.cell_height,
        );
        let snapshot = Page::new(viewport, &config).dump();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // Sized for real once the terminal is entered.
    let page = Page::new(Size::default(), &config);
    let mut app = App::new(config, theme, page);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazymodal").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazymodal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
