use crate::dto::*;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use domain::{DomainError, NewEmergencyContact};
use tracing::info;

type ApiResult<T> = Result<T, ApiError>;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

pub async fn user_exists(
    State(state): State<AppState>,
    query: Result<Query<UserExistsQuery>, QueryRejection>,
) -> ApiResult<Json<UserExistsResponse>> {
    let Query(query) = query?;
    let exists = state.app.user_service.user_exists(&query.email).await?;
    Ok(Json(UserExistsResponse { exists }))
}

pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;
    let redirect = form.next_page();

    let user = state.app.user_service.register(form.into_registration()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id: user.id,
            name: user.name,
            email: user.email,
            redirect: redirect.to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Form(form) = form?;
    let outcome = state.app.user_service.login(&form.email, &form.password).await?;
    Ok(Json(outcome.into()))
}

pub async fn submit_donor_form(
    State(state): State<AppState>,
    form: Result<Form<DonorForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;
    let donor = state
        .app
        .profile_service
        .complete_donor_profile(form.try_into()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileSubmittedResponse::new(
            "Donor profile created successfully",
            donor.user_id,
        )),
    ))
}

pub async fn submit_recipient_form(
    State(state): State<AppState>,
    form: Result<Form<RecipientForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;
    let receiver = state
        .app
        .profile_service
        .complete_receiver_profile(form.try_into()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileSubmittedResponse::new(
            "Recipient profile created successfully",
            receiver.user_id,
        )),
    ))
}

pub async fn add_emergency_contacts(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Vec<ContactPayload>>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = user_id?;
    let Json(payload) = payload?;

    // Unknown users are reported before any contact field errors
    state.app.user_service.get_user(user_id).await?;
    let contacts = payload
        .iter()
        .map(NewEmergencyContact::try_from)
        .collect::<Result<Vec<_>, DomainError>>()?;

    let stored = state.app.contact_service.add_contacts(user_id, contacts).await?;
    info!(user_id, count = stored.len(), "stored emergency contacts");

    Ok((
        StatusCode::CREATED,
        Json(AddContactsResponse {
            message: "Emergency contacts added successfully".to_string(),
            emergency_contacts: stored.into_iter().map(Into::into).collect(),
        }),
    ))
}

pub async fn get_emergency_contacts(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<ContactDto>>> {
    let Path(user_id) = user_id?;
    let contacts = state.app.contact_service.list_contacts(user_id).await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let Path(user_id) = user_id?;
    let profile = state.app.dashboard_service.load_profile(user_id).await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<DashboardResponse>> {
    let Path(user_id) = user_id?;
    let profile = state.app.dashboard_service.load_profile(user_id).await?;
    Ok(Json(DashboardResponse::new(profile, today())))
}

pub async fn get_system_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Blood donation registry API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
