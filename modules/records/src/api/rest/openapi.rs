use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "Roster API", description = "User accounts, appointments and help-desk chat"),
    paths(
        handlers::create_user,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::search_users,
        handlers::search_all_users,
        handlers::login,
        handlers::create_sched,
        handlers::list_scheds,
        handlers::get_sched,
        handlers::update_sched,
        handlers::delete_sched,
        handlers::chat,
    ),
    components(schemas(
        dto::MessageDto,
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::SchedDto,
        dto::CreateSchedReq,
        dto::UpdateSchedReq,
        dto::LoginReq,
        dto::ChatReq,
        dto::ChatResp,
        dto::UserEnvelope,
        dto::UserListEnvelope,
        dto::SchedEnvelope,
        dto::SchedListEnvelope,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "schedules", description = "Appointments"),
        (name = "auth", description = "Credential check"),
        (name = "chat", description = "Canned help-desk replies")
    )
)]
pub struct RecordsApiDoc;

/// Build the OpenAPI document for the records endpoints.
pub fn document() -> utoipa::openapi::OpenApi {
    RecordsApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_primary_routes() {
        let doc = document();
        for path in ["/users", "/users/{id}", "/users/search/{query}", "/scheds/{id}", "/login", "/chat"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn document_registers_schemas() {
        let doc = document();
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("UserDto"));
        assert!(schemas.contains_key("SchedEnvelope"));
    }
}
