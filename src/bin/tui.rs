use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todo_deck::tui::run().await
}
