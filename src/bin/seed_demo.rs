use si_seed_finder::batch::find_seeds_audited;
use si_seed_finder::config::load_config;
use si_seed_finder::diagnostics::SeedAuditLog;
use si_seed_finder::io::write_json_file;
use si_seed_finder::{SeedFinder, SeedingError};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SeedingError> {
    let config_path = env::args()
        .nth(1)
        .ok_or_else(|| SeedingError::InvalidConfig(usage()))?;
    let config_path = Path::new(&config_path);
    let config = load_config(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let events = config.resolve_events(base_dir)?;

    let finder = SeedFinder::new(config.finder.clone());
    let audit = SeedAuditLog::new();
    let reports = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SeedingError::InvalidConfig(format!("thread pool: {e}")))?
            .install(|| find_seeds_audited(&finder, &events, &audit)),
        None => find_seeds_audited(&finder, &events, &audit),
    };

    for report in &reports {
        println!("{}", report.describe());
    }
    let total: usize = reports.iter().map(|r| r.seeds.len()).sum();
    println!("Seeded {} events, {} seeds", reports.len(), total);

    if let Some(path) = &config.output.summary_json {
        write_json_file(path, &reports)?;
        println!("Wrote reports JSON to {}", path.display());
    }
    if let Some(path) = &config.output.audit_json {
        audit.write_json(path)?;
        println!("Wrote {} audit records to {}", audit.len(), path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: seed_demo <config.json>".to_string()
}
