fn main() -> anyhow::Result<()> {
    runedat::cli::run_cli()
}
