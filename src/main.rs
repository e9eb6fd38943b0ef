fn main() {
    preflight::app::cli::run();
}
