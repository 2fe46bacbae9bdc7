fn main() {
    if let Err(err) = csv2class::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
