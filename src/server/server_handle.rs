use rmcp::{ServerHandler, model::*, tool_handler};

use crate::server::KoleoServer;

#[tool_handler]
impl ServerHandler for KoleoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Polish railway assistant backed by Koleo (koleo.pl): station search, \
                 departure and arrival boards, connection search with prices, train routes \
                 and calendars, and seat occupancy.\n\n\
                 **RESULTS**:\n\
                 Every tool returns a JSON object with `data` (the structured result), \
                 `summary` (a human-readable digest) and `koleo_url` (a link to the same view \
                 on koleo.pl, empty when there is none). Failed calls also carry `error`: one \
                 of not_found, auth_required, invalid_params or unknown.\n\n\
                 **STATIONS**:\n\
                 Tools accept display names (\"Kraków Główny\") or slugs (\"krakow-glowny\"). \
                 Use search_stations when unsure of the exact name.\n\n\
                 **DATES**:\n\
                 Pass ISO dates (2026-02-27) or datetimes (2026-02-27T14:00). Omitted dates \
                 mean now.\n\n\
                 **TRAINS**:\n\
                 get_train_route takes a brand code (IC, TLK, REG ...) and train number and \
                 returns the train id used by get_train_by_id and get_realtime_timetable. \
                 Realtime data needs credentials in ~/.config/koleo-mcp/config.json; after \
                 editing that file call reset_client."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
