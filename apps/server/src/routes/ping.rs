use actix_web::{HttpResponse, Responder, get, web};
use siteping_service::monitoring::ResultsQuery;

macros_utils::routes! {
    route ping_route,
}

/// Latest outcome per target. Targets without a completed check are left out.
#[get("/ping")]
pub async fn ping_route(query: web::Data<ResultsQuery>) -> impl Responder {
    HttpResponse::Ok().json(query.get_results().await)
}
