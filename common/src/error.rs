use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] String),

    #[display(fmt = "Invalid identifier: {}", _0)]
    InvalidIdentifier(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Unauthorized(#[error(not(source))] String),

    #[display(fmt = "Too many requests")]
    TooManyRequests,

    #[display(fmt = "Token error: {}", _0)]
    Jwt(jsonwebtoken::errors::Error),

    #[display(fmt = "Store error: {}", _0)]
    Store(mongodb::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Store(err)
    }
}

impl From<mongodb::bson::ser::Error> for Error {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Error::Store(err.into())
    }
}

impl From<mongodb::bson::de::Error> for Error {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Error::Store(err.into())
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Store(err) => log::error!("Store failure: {}", err),
            Error::Jwt(err) => log::error!("Token issuance failure: {}", err),
            _ => {}
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Error::Jwt(_) | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
