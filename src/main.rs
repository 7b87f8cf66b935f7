fn main() -> Result<(), Box<dyn std::error::Error>> {
    plugdex::entry::run_app()
}
