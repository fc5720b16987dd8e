#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wooanalytics_app::run().await
}
