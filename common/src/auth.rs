//! Placeholder bearer-token collaborator: issues HS256 tokens for the fixed
//! login credentials and guards write endpoints.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuth {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(Error::Jwt)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|err| Error::Unauthorized(format!("Invalid token: {}", err)))
    }
}

/// Extractor proving that the request carried a valid bearer token. Handlers
/// taking it as their first argument reject unauthenticated calls with 401
/// before the body is read.
#[derive(Debug)]
pub struct Authorized(pub Claims);

impl FromRequest for Authorized {
    type Error = Error;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<Authorized> {
    let Some(auth) = req.app_data::<web::Data<JwtAuth>>() else {
        log::error!("No token verifier registered for {}", req.path());
        return Err(Error::Unauthorized("Token verification unavailable".to_string()));
    };

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix("Bearer ")) // remove prefix
        .ok_or_else(|| Error::Unauthorized("Missing Authorization Header".to_string()))?;

    match auth.verify(token) {
        Ok(claims) => Ok(Authorized(claims)),
        Err(err) => {
            log::warn!("Rejected token on {}: {}", req.path(), err);
            Err(err)
        }
    }
}
