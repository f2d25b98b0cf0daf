use actix_web::{
    post,
    web::{self, Json},
    HttpResponse,
};
use common::{auth::JwtAuth, error::Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Credentials;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Exchanges the configured placeholder credentials for a bearer token.
#[post("/login")]
pub async fn login(
    Json(data): Json<LoginRequest>,
    auth: web::Data<JwtAuth>,
    credentials: web::Data<Credentials>,
) -> Result<HttpResponse> {
    if data.username.as_deref() != Some(credentials.username.as_str())
        || data.password.as_deref() != Some(credentials.password.as_str())
    {
        log::warn!("Rejected login for {:?}", data.username);
        return Ok(HttpResponse::Unauthorized().json(json!({"msg": "Bad username or password"})));
    }

    let access_token = auth.issue(&credentials.username)?;
    Ok(HttpResponse::Ok().json(LoginResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::StatusCode,
        test::{self, init_service},
    };

    use super::*;
    use crate::{create_app, testutils::TestContext};

    #[actix_web::test]
    async fn test_login() {
        let context = TestContext::setup();
        let app = init_service(create_app(context.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(&LoginRequest {
                username: Some("admin".to_string()),
                password: Some("password".to_string()),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: LoginResponse = test::read_body_json(resp).await;
        let claims = context.state.auth.verify(&body.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[actix_web::test]
    async fn test_login_bad_credentials() {
        let context = TestContext::setup();
        let app = init_service(create_app(context.state.clone())).await;

        for (username, password) in [
            (Some("admin"), Some("wrong")),
            (Some("root"), Some("password")),
            (None, Some("password")),
            (None, None),
        ] {
            let req = test::TestRequest::post()
                .uri("/login")
                .set_json(&LoginRequest {
                    username: username.map(str::to_string),
                    password: password.map(str::to_string),
                })
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["msg"], "Bad username or password");
        }
    }
}
