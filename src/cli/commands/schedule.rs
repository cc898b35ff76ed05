use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::pipeline::Delivery;
use crate::core::schedule::{KIND, ScheduleLogic};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule {
        input,
        out,
        publish,
        dry_run,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database_path())?;
        let delivery = Delivery::from_flags(out.as_deref(), *publish, *dry_run);

        let result = ScheduleLogic::run(cfg, &pool, input.as_deref(), &delivery);
        if let Err(e) = &result {
            ttlog_soft(&pool.conn, "error", KIND, &e.to_string());
        }
        result?;
    }
    Ok(())
}
