use vrd_core::logging;

mod cli;

fn main() {
    // File log under the XDG state dir; stderr when that is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli::run_from_args() {
        eprintln!("vrd error: {:#}", err);
        std::process::exit(1);
    }
}
