use anyhow::Result;

fn main() -> Result<()> {
    zeek_log_parser::cli::run()
}
