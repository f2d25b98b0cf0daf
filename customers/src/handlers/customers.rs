use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use common::{
    auth::Authorized,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    models::{CustomerView, Validate},
    repositories::customer::CustomerRepo,
    schema::ApiVersion,
};

const NOT_FOUND: &str = "Customer with this ID not found";

fn default_page() -> u64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCustomersRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCustomerResponse {
    pub id: String,
}

fn validate<C: Validate>(customer: &C) -> Result<()> {
    customer.validate().map_err(Error::Validation)
}

pub async fn get_customers<V: ApiVersion>(
    query: web::Query<GetCustomersRequest>,
    repo: web::Data<CustomerRepo<V>>,
) -> Result<Json<Vec<CustomerView<V::Customer>>>> {
    if query.page == 0 {
        return Err(Error::Validation("page starts at 1".to_string()));
    }
    if query.page_size == Some(0) {
        return Err(Error::Validation("page_size must be positive".to_string()));
    }

    let customers = repo
        .list(query.page, query.page_size, query.name.as_deref())
        .await?;
    Ok(Json(customers.into_iter().map(CustomerView::from).collect()))
}

pub async fn get_customer<V: ApiVersion>(
    id: web::Path<String>,
    repo: web::Data<CustomerRepo<V>>,
) -> Result<Json<CustomerView<V::Customer>>> {
    let Some(customer) = repo.get(&id).await? else {
        return Err(Error::NotFound(NOT_FOUND.to_string()));
    };
    Ok(Json(customer.into()))
}

pub async fn post_customer<V: ApiVersion>(
    _: Authorized,
    repo: web::Data<CustomerRepo<V>>,
    Json(data): Json<V::Customer>,
) -> Result<HttpResponse> {
    validate(&data)?;

    let id = repo.add(data).await?;
    log::info!("Created {} customer {}", V::NAME, id);
    Ok(HttpResponse::Created().json(PostCustomerResponse { id }))
}

/// Replies with the body exactly as submitted.
pub async fn put_customer<V: ApiVersion>(
    _: Authorized,
    id: web::Path<String>,
    repo: web::Data<CustomerRepo<V>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let data: V::Customer =
        serde_json::from_value(body.clone()).map_err(|e| Error::Validation(e.to_string()))?;
    validate(&data)?;

    if repo.update(&id, data).await? == 0 {
        return Err(Error::NotFound(NOT_FOUND.to_string()));
    }
    log::info!("Replaced {} customer {}", V::NAME, id);
    Ok(Json(body))
}

pub async fn delete_customer<V: ApiVersion>(
    _: Authorized,
    id: web::Path<String>,
    repo: web::Data<CustomerRepo<V>>,
) -> Result<Json<u64>> {
    let deleted = repo.delete(&id).await?;
    if deleted == 0 {
        return Err(Error::NotFound(NOT_FOUND.to_string()));
    }
    log::info!("Deleted {} customer {}", V::NAME, id);
    Ok(Json(deleted))
}

/// Mounts the customer routes of generation `V` under `/api/<V>/customers`.
pub fn configure<V: ApiVersion>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(&V::scope())
            .service(
                web::resource(["", "/"])
                    .route(web::get().to(get_customers::<V>))
                    .route(web::post().to(post_customer::<V>)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_customer::<V>))
                    .route(web::put().to(put_customer::<V>))
                    .route(web::delete().to(delete_customer::<V>)),
            ),
    );
}
