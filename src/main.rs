fn main() {
    fsgate::app::cli::run();
}
