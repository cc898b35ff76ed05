use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        source,
        format,
        file,
        input,
        force,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database_path())?;
        let result = ExportLogic::export(
            cfg,
            &pool,
            *source,
            *format,
            file,
            input.as_deref(),
            *force,
        );
        if let Err(e) = &result {
            ttlog_soft(&pool.conn, "error", source.as_str(), &e.to_string());
        }
        result?;
    }
    Ok(())
}
