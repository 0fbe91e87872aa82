use std::{future::Future, sync::Arc};

use chrono::Local;
use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    serde_json, tool, tool_router,
};

use crate::{
    context::{ClientContext, Session},
    tools::{
        self, Envelope, ToolError, ToolOutput, board, connections, realtime, seats, stations,
        trains,
    },
};

pub mod args;
mod server_handle;

use args::*;

/// MCP server exposing the Koleo tools.
#[derive(Clone)]
pub struct KoleoServer {
    context: Arc<ClientContext>,
    tool_router: ToolRouter<KoleoServer>,
}

impl KoleoServer {
    pub fn new(context: Arc<ClientContext>) -> Self {
        Self {
            context,
            tool_router: Self::tool_router(),
        }
    }

    /// Print name and description of every tool.
    pub fn list_tools(&self) {
        for tool in self.tool_router.list_all() {
            println!("{}", tool.name);
            if let Some(description) = &tool.description {
                for line in description.trim().lines() {
                    println!("    {}", line.trim());
                }
            }
        }
    }

    async fn session(&self) -> Result<Arc<Session>, ToolError> {
        Ok(self.context.session().await?)
    }
}

/// Run a tool body and wrap its outcome in the JSON envelope.
async fn respond<F>(tool: &str, body: F) -> Result<CallToolResult, McpError>
where
    F: Future<Output = Result<ToolOutput, ToolError>>,
{
    tracing::info!(tool, "tool call");
    let result = body.await;
    if let Err(error) = &result {
        tracing::warn!(tool, kind = ?error.kind(), "{error}");
    }

    let envelope = Envelope::from(result);
    let text = serde_json::to_string(&envelope)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    let content = vec![Content::text(text)];
    Ok(if envelope.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    })
}

#[tool_router]
impl KoleoServer {
    #[tool(
        description = "Search Koleo for railway or bus stations by partial name. Optionally filter by station type (rail, bus, group) and country code."
    )]
    async fn search_stations(
        &self,
        Parameters(SearchStationsRequest {
            query,
            station_type,
            country,
        }): Parameters<SearchStationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("search_stations", async {
            let session = self.session().await?;
            stations::search_stations(
                session.api.as_ref(),
                &query,
                station_type.as_deref(),
                country.as_deref(),
            )
            .await
        })
        .await
    }

    #[tool(description = "Station details: address, opening hours and available facilities.")]
    async fn get_station_info(
        &self,
        Parameters(StationRequest { station }): Parameters<StationRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_station_info", async {
            let session = self.session().await?;
            stations::get_station_info(session.api.as_ref(), &station).await
        })
        .await
    }

    #[tool(description = "Departure board for a station, from the given time onwards.")]
    async fn get_departures(
        &self,
        Parameters(BoardRequest { station, date }): Parameters<BoardRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_departures", async {
            let when = tools::resolve_when(date.as_deref())?;
            let session = self.session().await?;
            board::get_departures(session.api.as_ref(), &station, when).await
        })
        .await
    }

    #[tool(description = "Arrival board for a station, from the given time onwards.")]
    async fn get_arrivals(
        &self,
        Parameters(BoardRequest { station, date }): Parameters<BoardRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_arrivals", async {
            let when = tools::resolve_when(date.as_deref())?;
            let session = self.session().await?;
            board::get_arrivals(session.api.as_ref(), &station, when).await
        })
        .await
    }

    #[tool(
        description = "Departures and arrivals of a station merged into one board in time order. Each entry is tagged as departure or arrival."
    )]
    async fn get_all_trains(
        &self,
        Parameters(BoardRequest { station, date }): Parameters<BoardRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_all_trains", async {
            let when = tools::resolve_when(date.as_deref())?;
            let session = self.session().await?;
            board::get_all_trains(session.api.as_ref(), &station, when).await
        })
        .await
    }

    #[tool(description = "
        Search train connections between two stations departing after the given time.
        Optionally restrict to brands (e.g. IC, EIC, TLK, REG), direct connections only,
        and attach ticket prices. Returns up to `length` connections (default 5).")]
    async fn search_connections(
        &self,
        Parameters(SearchConnectionsRequest {
            start,
            end,
            date,
            brands,
            direct,
            include_prices,
            length,
        }): Parameters<SearchConnectionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("search_connections", async {
            let when = tools::resolve_when(date.as_deref())?;
            let session = self.session().await?;
            connections::search_connections(
                session.api.as_ref(),
                connections::SearchParams {
                    start: &start,
                    end: &end,
                    when,
                    brands: brands.as_deref(),
                    direct: direct.unwrap_or(false),
                    include_prices: include_prices.unwrap_or(false),
                    length: length.unwrap_or(connections::DEFAULT_LENGTH),
                },
            )
            .await
        })
        .await
    }

    #[tool(description = "
        Route and stops of a train given its brand and number on a date.
        If the train does not run that day the nearest following running day is used.")]
    async fn get_train_route(
        &self,
        Parameters(TrainRouteRequest {
            brand,
            train_number,
            date,
            closest,
        }): Parameters<TrainRouteRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_train_route", async {
            let day = tools::resolve_when(date.as_deref())?.date();
            let session = self.session().await?;
            trains::get_train_route(
                session.api.as_ref(),
                &brand,
                &train_number,
                day,
                closest.unwrap_or(false),
            )
            .await
        })
        .await
    }

    #[tool(description = "Route and stops of a train instance by its Koleo train id.")]
    async fn get_train_by_id(
        &self,
        Parameters(TrainIdRequest { train_id }): Parameters<TrainIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_train_by_id", async {
            let session = self.session().await?;
            trains::get_train_by_id(session.api.as_ref(), train_id).await
        })
        .await
    }

    #[tool(description = "Days on which a train (brand and number) runs, with its next running date.")]
    async fn get_train_calendar(
        &self,
        Parameters(TrainCalendarRequest {
            brand,
            train_number,
        }): Parameters<TrainCalendarRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_train_calendar", async {
            let session = self.session().await?;
            trains::get_train_calendar(
                session.api.as_ref(),
                &brand,
                &train_number,
                Local::now().date_naive(),
            )
            .await
        })
        .await
    }

    #[tool(description = "
        Seat occupancy of a train between two stations: free, reserved and blocked seat counts.
        `stations` must hold exactly two names: [start_station, end_station].")]
    async fn get_seat_stats(
        &self,
        Parameters(SeatStatsRequest {
            brand,
            train_number,
            stations,
            date,
        }): Parameters<SeatStatsRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_seat_stats", async {
            seats::station_pair(&stations)?;
            let when = tools::resolve_when(date.as_deref())?;
            let session = self.session().await?;
            seats::get_seat_stats(session.api.as_ref(), &brand, &train_number, &stations, when)
                .await
        })
        .await
    }

    #[tool(description = "Per-seat states and counts for a known connection id, train number and place type.")]
    async fn get_seat_availability(
        &self,
        Parameters(SeatAvailabilityRequest {
            connection_id,
            train_nr,
            place_type,
        }): Parameters<SeatAvailabilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_seat_availability", async {
            let session = self.session().await?;
            seats::get_seat_availability(session.api.as_ref(), connection_id, train_nr, place_type)
                .await
        })
        .await
    }

    #[tool(description = "List train brands (operator service tiers) known to Koleo.")]
    async fn get_brands(&self) -> Result<CallToolResult, McpError> {
        respond("get_brands", async {
            let session = self.session().await?;
            seats::get_brands(session.api.as_ref()).await
        })
        .await
    }

    #[tool(description = "List railway carriers known to Koleo.")]
    async fn get_carriers(&self) -> Result<CallToolResult, McpError> {
        respond("get_carriers", async {
            let session = self.session().await?;
            seats::get_carriers(session.api.as_ref()).await
        })
        .await
    }

    #[tool(
        description = "Live timetable with actual vs planned times for a train instance. Requires Koleo credentials in the config file."
    )]
    async fn get_realtime_timetable(
        &self,
        Parameters(RealtimeRequest {
            train_id,
            operating_day,
        }): Parameters<RealtimeRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_realtime_timetable", async {
            let day = tools::resolve_when(operating_day.as_deref())?.date();
            let session = self.session().await?;
            realtime::get_realtime_timetable(session.api.as_ref(), &session.config, train_id, day)
                .await
        })
        .await
    }

    #[tool(
        description = "Drop the cached Koleo client so the next call re-reads the configuration file."
    )]
    async fn reset_client(&self) -> Result<CallToolResult, McpError> {
        respond("reset_client", async {
            let was_initialized = self.context.is_initialized().await;
            self.context.reset().await;
            ToolOutput::new(
                serde_json::json!({ "was_initialized": was_initialized }),
                "Koleo client reset. Configuration will be reloaded on the next call.",
                "",
            )
        })
        .await
    }
}
