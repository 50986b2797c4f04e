use medbiz::LogContext;
use medbiz_loader::{load_and_report, LoaderConfig};

fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = LoaderConfig::discover(&cwd)?;

    // ----------------------
    // Initialize logging
    // ----------------------
    let logs = LogContext::init(&config.logging)?;
    if logs.install_global().is_err() {
        eprintln!("Logging registry already initialized");
    }

    println!("Current working directory: {}", cwd.display());

    let data_path = config.resolve_data_path(&cwd);
    let mut stdout = std::io::stdout().lock();

    // Failures are already in the error log; the run itself still succeeds.
    let _ = load_and_report(&data_path, &logs, &mut stdout, config.head_rows);

    Ok(())
}
