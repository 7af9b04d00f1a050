fn main() {
    if let Err(err) = csv_intake_lib::run() {
        eprintln!("csv_intake failed: {}", err);
        std::process::exit(1);
    }
}
