#[tokio::main]
async fn main() -> anyhow::Result<()> {
    routechat_lib::run().await
}
