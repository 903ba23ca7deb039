use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    standup::cli::run().await
}
