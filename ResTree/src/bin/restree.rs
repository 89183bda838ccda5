fn main() -> anyhow::Result<()> {
    restree::cli::run_cli()
}
