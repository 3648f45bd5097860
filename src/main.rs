fn main() {
    if let Err(error) = obb_import::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
