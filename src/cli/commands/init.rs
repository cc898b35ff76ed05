use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (skipped in test mode)
///  - the SQLite run log
pub fn handle(cli: &Cli, config_path: &std::path::Path) -> AppResult<()> {
    let cfg = Config::init_all(config_path, cli.db.clone(), cli.test)?;
    let db_path = cfg.database_path();

    println!("⚙️  Initializing sitefeed…");
    if cli.test {
        println!("📄 Config file : (test mode, not written)");
    } else {
        println!("📄 Config file : {}", config_path.display());
    }
    println!("🗄️  Run log    : {}", db_path.display());

    let pool = DbPool::new(&db_path)?;

    ttlog_soft(
        &pool.conn,
        "init",
        "",
        &format!("Run log initialized at {}", db_path.display()),
    );

    println!("🎉 sitefeed initialization completed!");
    Ok(())
}
