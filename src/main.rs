use clap::Parser;
use mazecarve::app::{self, AppConfig};

fn main() -> std::io::Result<()> {
    let config = AppConfig::parse();
    let _guard = app::init_tracing("mazecarve.log");

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, &config);
    // Restore the terminal even if the run failed, then report the run's error first
    let restored = app::restore_terminal(&mut stdout);
    if let Err(e) = &result {
        tracing::error!("Run failed: {}", e);
    }
    result.and(restored)
}
