use std::process;

fn main() {
    if let Err(e) = rundown::cli::run() {
        rundown::ui::print_error(&e);
        process::exit(e.exit_code());
    }
}
