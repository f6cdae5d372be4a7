#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stock_radar::run().await
}
