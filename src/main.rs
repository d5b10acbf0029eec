fn main() {
    if let Err(error) = timeblock_planner::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
