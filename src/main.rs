//! daybook main entrypoint.

use daybook::run;
use daybook::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
