//! List hubs.

use anyhow::Result;
use hub_core::{Hub, HubSummary};

use crate::context::Context;

/// Run the hubs command.
pub async fn run(ctx: &Context) -> Result<()> {
    let hubs: Vec<HubSummary> = ctx
        .hubs()
        .snapshot()
        .await
        .iter()
        .filter(|hub| hub.is_active())
        .map(Hub::summary)
        .collect();

    ctx.output.hub_table(&hubs);
    Ok(())
}
