#[tokio::main]
async fn main() -> anyhow::Result<()> {
    synopdf_server::start().await
}
