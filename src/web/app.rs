use actix_web::{web, HttpResponse, Result};
use log::{error, info, warn};

use crate::domain::{
    find_by_category, find_by_id, handle_auction, handle_user, list, parse_id, AuctionCommand,
    CommandSuccess, Entity, Errors, HandleError, UserCommand,
};
use super::types::{ApiError, AppState, Removed, Resource, StateChanged, WELCOME};

fn not_found(resource: Resource) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(resource.not_found()))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiError::new("No se pudo acceder a los datos"))
}

fn error_response(err: &HandleError) -> HttpResponse {
    match err {
        HandleError::Domain(Errors::UnknownAuction(_)) => not_found(Resource::Auction),
        HandleError::Domain(Errors::UnknownUser(_)) => not_found(Resource::User),
        HandleError::Domain(Errors::UnknownCategory(_)) => {
            HttpResponse::NotFound().json(ApiError::new("La categoria no fue encontrada"))
        }
        HandleError::Domain(Errors::AuctionClosed(_)) => HttpResponse::BadRequest()
            .json(ApiError::new("La subasta no está abierta para ofertas.")),
        HandleError::Domain(Errors::IdSpaceExhausted) => HttpResponse::BadRequest()
            .json(ApiError::new("No quedan identificadores disponibles")),
        HandleError::Persistence(_) => internal_error(),
    }
}

fn success_response(resource: Resource, success: CommandSuccess) -> HttpResponse {
    match success {
        CommandSuccess::Added(entity) => {
            info!("Created {:?} {}", resource, entity.get("id").unwrap_or(&serde_json::Value::Null));
            HttpResponse::Created().json(entity)
        }
        CommandSuccess::Updated(entity) => HttpResponse::Ok().json(entity),
        CommandSuccess::Removed(_) => HttpResponse::Ok().json(Removed {
            mensaje: resource.removed().to_string(),
        }),
        CommandSuccess::StateChanged { .. } => HttpResponse::Ok().json(StateChanged {
            message: "Estado cambiado".to_string(),
        }),
        CommandSuccess::BidAccepted(bid) => HttpResponse::Created().json(bid),
    }
}

// Store access does blocking file I/O, keep it off the async workers
async fn blocking<T, F>(f: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> Result<T, HandleError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(&err)),
        Err(err) => {
            error!("Store task failed: {}", err);
            Err(internal_error())
        }
    }
}

async fn run_auction_command(data: &AppState, command: AuctionCommand) -> HttpResponse {
    let store = data.auctions.clone();
    let policies = data.policies;
    let result = blocking(move || {
        store.modify(|auctions| Ok(handle_auction(command, auctions, &policies)?))
    })
    .await;

    match result {
        Ok(success) => success_response(Resource::Auction, success),
        Err(response) => response,
    }
}

async fn run_user_command(data: &AppState, command: UserCommand) -> HttpResponse {
    let store = data.users.clone();
    let policies = data.policies;
    let result = blocking(move || {
        store.modify(|users| Ok(handle_user(command, users, &policies)?))
    })
    .await;

    match result {
        Ok(success) => success_response(Resource::User, success),
        Err(response) => response,
    }
}

async fn welcome() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().body(WELCOME))
}

// Get all auctions
async fn get_auctions(data: web::Data<AppState>) -> Result<HttpResponse> {
    let store = data.auctions.clone();
    Ok(match blocking(move || store.read(list)).await {
        Ok(auctions) => HttpResponse::Ok().json(auctions),
        Err(response) => response,
    })
}

// Get all users
async fn get_users(data: web::Data<AppState>) -> Result<HttpResponse> {
    let store = data.users.clone();
    Ok(match blocking(move || store.read(list)).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(response) => response,
    })
}

// Get auction by ID
async fn get_auction(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::Auction));
    };
    let store = data.auctions.clone();
    let found = blocking(move || store.read(|auctions| find_by_id(auctions, id).cloned())).await;

    Ok(match found {
        Ok(Some(auction)) => HttpResponse::Ok().json(auction),
        Ok(None) => not_found(Resource::Auction),
        Err(response) => response,
    })
}

// Get the first user of a category
async fn get_user_by_category(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let categoria = path.into_inner();
    let store = data.users.clone();
    let found = blocking(move || {
        store.read(|users| {
            find_by_category(users, &categoria)
                .cloned()
                .ok_or(Errors::UnknownCategory(categoria.clone()))
        })
    })
    .await;

    Ok(match found {
        Ok(Ok(user)) => HttpResponse::Ok().json(user),
        Ok(Err(err)) => error_response(&HandleError::from(err)),
        Err(response) => response,
    })
}

// Get user by ID
async fn get_user(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::User));
    };
    let store = data.users.clone();
    let found = blocking(move || store.read(|users| find_by_id(users, id).cloned())).await;

    Ok(match found {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => not_found(Resource::User),
        Err(response) => response,
    })
}

// Create a new auction
async fn create_auction(body: web::Json<Entity>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let command = AuctionCommand::AddAuction { auction: body.into_inner() };
    Ok(run_auction_command(&data, command).await)
}

// Create a new user
async fn create_user(body: web::Json<Entity>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let command = UserCommand::AddUser { user: body.into_inner() };
    Ok(run_user_command(&data, command).await)
}

// Update an auction
async fn update_auction(
    path: web::Path<String>,
    body: web::Json<Entity>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::Auction));
    };
    let command = AuctionCommand::UpdateAuction { id, patch: body.into_inner() };
    Ok(run_auction_command(&data, command).await)
}

// Update a user
async fn update_user(
    path: web::Path<String>,
    body: web::Json<Entity>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::User));
    };
    let command = UserCommand::UpdateUser { id, patch: body.into_inner() };
    Ok(run_user_command(&data, command).await)
}

// Open a closed auction, close anything else
async fn toggle_auction_state(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::Auction));
    };
    Ok(run_auction_command(&data, AuctionCommand::ToggleState { id }).await)
}

// Delete an auction
async fn delete_auction(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::Auction));
    };
    Ok(run_auction_command(&data, AuctionCommand::RemoveAuction { id }).await)
}

// Delete a user
async fn delete_user(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::User));
    };
    Ok(run_user_command(&data, UserCommand::RemoveUser { id }).await)
}

// Place a bid on an auction
async fn place_bid(
    path: web::Path<String>,
    body: web::Json<Entity>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return Ok(not_found(Resource::Auction));
    };
    let response = run_auction_command(&data, AuctionCommand::PlaceBid { id, bid: body.into_inner() }).await;
    if response.status().is_client_error() {
        warn!("Bid on auction {} rejected with {}", id, response.status());
    }
    Ok(response)
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/", web::get().to(welcome))
            .route("/subastas", web::get().to(get_auctions))
            .route("/lista", web::get().to(get_users))
            .route("/subastas/{id}", web::get().to(get_auction))
            .route("/lista/categoria/{categoria}", web::get().to(get_user_by_category))
            .route("/lista/id/{id}", web::get().to(get_user))
            .route("/subastas", web::post().to(create_auction))
            .route("/lista", web::post().to(create_user))
            .route("/subastas/{id}", web::put().to(update_auction))
            .route("/lista/{id}", web::put().to(update_user))
            .route("/EstadoC/{id}", web::delete().to(toggle_auction_state))
            .route("/subastas/{id}", web::delete().to(delete_auction))
            .route("/lista/{id}", web::delete().to(delete_user))
            .route("/subastas/{id}/ofertas", web::post().to(place_bid)),
    );
}
