fn main() {
    if let Err(e) = lodestone_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
