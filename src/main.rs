#[tokio::main]
async fn main() -> anyhow::Result<()> {
    antique_vault_lib::run().await
}
