//! List stored routes.

use anyhow::Result;

use crate::context::Context;

/// Run the routes command.
pub async fn run(ctx: &Context) -> Result<()> {
    let routes = ctx.service.list_routes().await?;
    ctx.output.route_table(&routes);
    Ok(())
}
