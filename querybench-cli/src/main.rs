//! QueryBench binary entry point.

fn main() {
    if let Err(e) = querybench_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
