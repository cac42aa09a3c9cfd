fn main() -> anyhow::Result<()> {
    snapshot_timeline::cli::run()
}
