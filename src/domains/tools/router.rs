//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only lists them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::geo::GeoServices;

use super::definitions::{BookUberTool, UserPositionTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(services: Arc<GeoServices>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(BookUberTool::create_route(services.clone()))
        .with_route(UserPositionTool::create_route(services))
}
