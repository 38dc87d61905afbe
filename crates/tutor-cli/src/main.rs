use std::process;

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}"); // pretty anyhow chain
        process::exit(1);
    }
}
