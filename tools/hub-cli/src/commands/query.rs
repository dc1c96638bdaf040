//! Direct and shortest route queries.

use anyhow::{bail, Result};
use hub_route::ShortestRoute;

use super::PairArgs;
use crate::context::Context;

/// Run the direct command.
pub async fn direct(args: PairArgs, ctx: &Context) -> Result<()> {
    let from = ctx.hub(&args.from).await?;
    let to = ctx.hub(&args.to).await?;

    let Some(route) = ctx.service.get_direct_route(&from, &to).await? else {
        bail!("No direct route from {} to {}", args.from, args.to);
    };
    ctx.output.route(&format!("{} → {}", args.from, args.to), &route);
    Ok(())
}

/// Run the shortest command.
pub async fn shortest(args: PairArgs, ctx: &Context) -> Result<()> {
    let from = ctx.hub(&args.from).await?;
    let to = ctx.hub(&args.to).await?;

    match ctx.service.get_shortest_route(&from, &to).await? {
        ShortestRoute::Found(route) => {
            ctx.output.route(&format!("{} → {}", args.from, args.to), &route);
            Ok(())
        }
        outcome @ ShortestRoute::NoRoute { .. } => {
            if ctx.output.json(&outcome) {
                return Ok(());
            }
            bail!("No route from {} to {}", args.from, args.to)
        }
    }
}
