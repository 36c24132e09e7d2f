fn main() -> Result<(), eframe::Error> {
    devstories_frontend::run_frontend()
}
