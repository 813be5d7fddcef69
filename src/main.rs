/*
 * Responsibility
 * - tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    vehicle_registry::app::run().await
}
