//! Account and user directory handlers.
//!
//! ```text
//! POST /api/signup {"email":"ada@example.com","username":"ada","password":"hunter22"}
//! POST /api/authenticate {"email":"ada@example.com","password":"hunter22"}
//! GET  /api/users?sortType=-created
//! GET  /api/user/profile/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::UserSort;
use crate::domain::{ApiResult, Error, LoginCredentials, SignupCredentials, User};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{AuthResponse, ProfileResponse, UserResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{required, user_id};

/// Signup request body for `POST /api/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "hunter22")]
    pub password: Option<String>,
}

impl TryFrom<SignupRequest> for SignupCredentials {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        let email = required("email", value.email)?;
        let username = required("username", value.username)?;
        let password = required("password", value.password)?;
        Ok(Self::try_from_parts(&email, &username, &password)?)
    }
}

/// Login request body for `POST /api/authenticate`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AuthenticateRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "hunter22")]
    pub password: Option<String>,
}

impl TryFrom<AuthenticateRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: AuthenticateRequest) -> Result<Self, Self::Error> {
        let email = required("email", value.email)?;
        let password = required("password", value.password)?;
        Ok(Self::try_from_parts(&email, &password)?)
    }
}

/// Optional ordering for `GET /api/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    /// One of `created`, `-created`, `username`, `-username`.
    pub sort_type: Option<String>,
}

fn parse_user_sort(raw: Option<&str>) -> Result<UserSort, Error> {
    raw.map_or(Ok(UserSort::default()), |value| {
        value
            .parse()
            .map_err(|_| Error::invalid_request(format!("Unknown sort type: {value}.")))
    })
}

fn user_list(users: &[User]) -> Vec<UserResponse> {
    users.iter().map(UserResponse::from).collect()
}

/// Register an account and return a signed token.
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 422, description = "Validation failed or account exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = SignupCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.signup(credentials).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new("User created!", &session)))
}

/// Exchange email and password for a signed token.
#[utoipa::path(
    post,
    path = "/api/authenticate",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 403, description = "Wrong email or password", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "authenticate",
    security([])
)]
#[post("/authenticate")]
pub async fn authenticate(
    state: web::Data<HttpState>,
    payload: web::Json<AuthenticateRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.authenticate(credentials).await?;
    Ok(web::Json(AuthResponse::new(
        "Authentication successful!",
        &session,
    )))
}

/// List every user, newest first unless `sortType` says otherwise.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Unknown sort type", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<UserListQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let sort = parse_user_sort(query.sort_type.as_deref())?;
    let users = state.users.list_users(sort).await?;
    Ok(web::Json(user_list(&users)))
}

/// Users whose username contains the path fragment, ignoring case.
#[utoipa::path(
    get,
    path = "/api/users/{search}",
    params(("search" = String, Path, description = "Username fragment")),
    responses((status = 200, description = "Matching users", body = [UserResponse])),
    tags = ["users"],
    operation_id = "searchUsers",
    security([])
)]
#[get("/users/{search}")]
pub async fn search_users(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.search_users(&path.into_inner()).await?;
    Ok(web::Json(user_list(&users)))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "findUser",
    security([])
)]
#[get("/user/{id}")]
pub async fn find_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    let user = state.users.find_user(&id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Public profile with question and answer statistics.
#[utoipa::path(
    get,
    path = "/api/user/profile/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "userProfile",
    security([])
)]
#[get("/user/profile/{id}")]
pub async fn profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = user_id(&path)?;
    let profile = state.users.profile(&id).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}

/// Grant the "diamond" moderator flag. Admin only.
#[utoipa::path(
    get,
    path = "/api/user/promoteToDiamond/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Promoted user", body = UserResponse),
        (status = 401, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "promoteToDiamond"
)]
#[get("/user/promoteToDiamond/{id}")]
pub async fn promote_to_diamond(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    let promoted = state.accounts.promote_to_diamond(user.actor(), &id).await?;
    Ok(web::Json(UserResponse::from(&promoted)))
}
