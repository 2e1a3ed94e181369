pub mod model;
pub mod view;

use crate::AppState;
use crate::parser::markdown::{compile_markdown_to_html, resolve_wiki_link, wiki_path};
use crate::services::DataServiceError;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use model::{CreatePageForm, DeletePageForm, PageView, SavePageForm};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Service(#[from] DataServiceError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Service(e) => {
                // the cause stays in the logs; the user sees a generic failure
                error!(error = %e, "Data service request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(view::render_error("Something went wrong. Please try again.")),
                )
                    .into_response()
            }
            PageError::BadRequest(msg) => {
                warn!(reason = %msg, "Rejected request");
                (StatusCode::BAD_REQUEST, Html(view::render_error(&msg))).into_response()
            }
        }
    }
}

pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/wiki/{page}", get(page_rendering_handler))
        .route("/create", post(page_create_handler))
        .route("/save", post(page_update_handler))
        .route("/delete", post(page_deletion_handler))
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let pages = state.data_service.list_pages().await?;
    Ok(Html(view::render_index("Wiki home", &pages)))
}

async fn page_rendering_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>, PageError> {
    let lookup = state.data_service.get_page(&page).await?;

    let page_view = PageView::from_lookup(
        &page,
        lookup,
        |raw| compile_markdown_to_html(raw, resolve_wiki_link),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    Ok(Html(view::render_page(&page_view)))
}

// no store access: just send the browser to the (possibly virtual) page
async fn page_create_handler(Form(form): Form<CreatePageForm>) -> Redirect {
    let name = form.name.trim();
    if name.is_empty() {
        Redirect::to("/")
    } else {
        Redirect::to(&wiki_path(name))
    }
}

async fn page_update_handler(
    State(state): State<AppState>,
    Form(form): Form<SavePageForm>,
) -> Result<Redirect, PageError> {
    if form.is_new_page() {
        if form.title.trim().is_empty() {
            return Err(PageError::BadRequest("A page name is required.".into()));
        }
        state
            .data_service
            .create_page(&form.title, &form.markdown)
            .await?;
    } else {
        let id = parse_page_id(&form.id)?;
        state.data_service.save_page(id, &form.markdown).await?;
    }

    Ok(Redirect::to(&wiki_path(&form.title)))
}

async fn page_deletion_handler(
    State(state): State<AppState>,
    Form(form): Form<DeletePageForm>,
) -> Result<Redirect, PageError> {
    let id = parse_page_id(&form.id)?;
    state.data_service.delete_page(id).await?;
    Ok(Redirect::to("/"))
}

fn parse_page_id(raw: &str) -> Result<i64, PageError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PageError::BadRequest(format!("Invalid page id: {:?}", raw)))
}
