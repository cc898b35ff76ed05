//! sitefeed main entrypoint.

use sitefeed::run;
use sitefeed::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
