use clap::Parser;
use routechat_lib::publisher::{publish, PublishRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let request = PublishRequest::parse();
    publish(&request).await
}
