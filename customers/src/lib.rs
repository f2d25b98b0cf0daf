pub mod config;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod schema;
#[cfg(test)]
mod testutils;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    middleware, web, App,
};
use common::{auth::JwtAuth, error::Error, rate_limit::ClientRateLimiter};
use futures::future::{ready, Either, TryFutureExt};
use mongodb::Database;

use crate::{
    config::{Config, Credentials},
    handlers::{auth::login, customers::configure},
    repositories::customer::CustomerRepo,
    schema::{V1, V2},
};

/// Everything the handlers share across requests and workers.
#[derive(Clone)]
pub struct ServiceState {
    pub v1: CustomerRepo<V1>,
    pub v2: CustomerRepo<V2>,
    pub auth: JwtAuth,
    pub credentials: Credentials,
    pub limiter: ClientRateLimiter,
}

impl ServiceState {
    pub fn new(database: &Database, config: &Config) -> Self {
        Self {
            v1: CustomerRepo::mongo(database, config.cache),
            v2: CustomerRepo::mongo(database, config.cache),
            auth: JwtAuth::new(config.jwt_secret.as_bytes(), config.jwt_ttl),
            credentials: config.credentials.clone(),
            limiter: ClientRateLimiter::new(config.rate_limit),
        }
    }
}

pub fn create_app(
    state: ServiceState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let limiter = state.limiter.clone();

    App::new()
        .wrap_fn(move |req, srv| match limiter.check_request(&req) {
            Ok(()) => Either::Left(srv.call(req).map_ok(|res| res.map_into_boxed_body())),
            Err(err) => Either::Right(ready(Ok(req.error_response(err)))),
        })
        .wrap(Cors::permissive())
        .wrap(middleware::Logger::default())
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| Error::Validation(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| Error::Validation(err.to_string()).into()),
        )
        .app_data(web::Data::new(state.v1))
        .app_data(web::Data::new(state.v2))
        .app_data(web::Data::new(state.auth))
        .app_data(web::Data::new(state.credentials))
        .service(login)
        .configure(configure::<V1>)
        .configure(configure::<V2>)
}
