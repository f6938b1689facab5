use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, get};

macros_utils::routes! {
    route index_route,
}

pub const BANNER: &str = "HTTP Check Service. Go to /ping for results";

/// Banner pointing at the results route
#[get("/")]
pub async fn index_route() -> impl Responder {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body(BANNER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_index_banner() {
        let app = test::init_service(App::new().configure(routes)).await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(response.status().is_success());

        let body = test::read_body(response).await;
        assert_eq!(body, BANNER.as_bytes());
    }
}
