use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::{fs, io};

use ntex::util::Bytes;
use ntex::web;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::app::BlogApp;
use crate::config::Config;
use crate::form_data::FormUpdate;
use crate::model::PostId;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::view::page_renderer::PageRenderer;

struct AppState {
    app: BlogApp<FileStorage>,
    config: Config,
}

type SharedState = web::types::State<Arc<Mutex<AppState>>>;

fn lock(state: &SharedState) -> MutexGuard<'_, AppState> {
    // Mutations commit only after a successful write, so poisoned state is still consistent
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn redirect_home() -> web::HttpResponse {
    web::HttpResponse::SeeOther()
        .header("Location", "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}

fn to_response<T>(result: io::Result<T>, action: &str) -> web::HttpResponse {
    match result {
        Ok(_) => redirect_home(),
        Err(e) if e.kind() == ErrorKind::NotFound => web::HttpResponse::NotFound()
            .body(format!("Error {}: {}", action, e)),
        Err(e) => {
            error!("Error {}: {}", action, e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error {}: {}", action, e))
        }
    }
}

fn render_page<S: KeyValueStorage + Clone>(template_dir: &Path, app: &BlogApp<S>) -> io::Result<String> {
    let template_path = template_dir.join("page.tpl");
    let template_src = fs::read_to_string(&template_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error reading template {}: {}", template_path.display(), e)))?;
    let renderer = PageRenderer::new(&template_src)?;
    Ok(renderer.render(app.draft(), app.posts(), app.modal()))
}

fn save_draft<S: KeyValueStorage + Clone>(app: &mut BlogApp<S>, body: &[u8]) -> web::HttpResponse {
    let update = FormUpdate::from_bytes(body);
    to_response(app.apply_form(&update), "saving draft")
}

/// Fields posted with the submit button are applied to the draft first.
fn submit_form<S: KeyValueStorage + Clone>(app: &mut BlogApp<S>, body: &[u8]) -> web::HttpResponse {
    let update = FormUpdate::from_bytes(body);
    if let Err(e) = app.apply_form(&update) {
        return to_response::<()>(Err(e), "saving draft");
    }
    to_response(app.submit(), "submitting post")
}

fn view_post<S: KeyValueStorage + Clone>(app: &mut BlogApp<S>, id: String) -> web::HttpResponse {
    to_response(app.view(&PostId(id)), "viewing post")
}

fn delete_post<S: KeyValueStorage + Clone>(app: &mut BlogApp<S>, id: String) -> web::HttpResponse {
    to_response(app.delete(&PostId(id)), "deleting post")
}

fn close_modal<S: KeyValueStorage + Clone>(app: &mut BlogApp<S>) -> web::HttpResponse {
    app.close_modal();
    redirect_home()
}

#[web::get("/")]
async fn index(state: SharedState) -> web::HttpResponse {
    let state = lock(&state);
    match render_page(&state.config.paths.template_dir, &state.app) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => {
            error!("Error rendering page: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error rendering page: {}", e))
        }
    }
}

#[web::post("/draft")]
async fn draft(body: Bytes, state: SharedState) -> web::HttpResponse {
    save_draft(&mut lock(&state).app, &body)
}

#[web::post("/submit")]
async fn submit(body: Bytes, state: SharedState) -> web::HttpResponse {
    submit_form(&mut lock(&state).app, &body)
}

#[web::post("/view/{id}")]
async fn view(id: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    view_post(&mut lock(&state).app, id.into_inner())
}

#[web::post("/delete/{id}")]
async fn delete(id: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    delete_post(&mut lock(&state).app, id.into_inner())
}

#[web::post("/close")]
async fn close(state: SharedState) -> web::HttpResponse {
    close_modal(&mut lock(&state).app)
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: SharedState) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = lock(&state).config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let storage = FileStorage::open(&config.paths.data_dir)?;
    let app = BlogApp::load(storage, &config.storage);
    info!("Loaded {} posts from {}", app.posts().len(), config.paths.data_dir.display());

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(Mutex::new(AppState {
        app,
        config,
    }));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(draft)
            .service(submit)
            .service(view)
            .service(delete)
            .service(close)
            .service(public_files)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use ntex::http::header::LOCATION;
    use ntex::http::StatusCode;

    use crate::config::Storage;
    use crate::model::DraftField;
    use crate::storage::MemoryStorage;
    use crate::test_data::{FailingStorage, DRAFT_KEY};

    use super::*;

    fn new_app<S: KeyValueStorage + Clone>(storage: S) -> BlogApp<S> {
        BlogApp::load(storage, &Storage::default())
    }

    fn assert_redirect_home(resp: &web::HttpResponse) {
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp.headers().get(LOCATION).and_then(|v| v.to_str().ok());
        assert_eq!(location, Some("/"));
    }

    #[test]
    fn test_save_draft() {
        let mut app = new_app(MemoryStorage::new());
        let resp = save_draft(&mut app, b"author_name=Ana&title=Hi+there&evil=1");
        assert_redirect_home(&resp);
        assert_eq!(app.draft().metadata.author.name, "Ana");
        assert_eq!(app.draft().content.title, "Hi there");
        assert!(app.posts().is_empty());
    }

    #[test]
    fn test_submit_applies_posted_fields() -> io::Result<()> {
        let mut app = new_app(MemoryStorage::new());
        app.edit_field(DraftField::AuthorName, "Ana")?;

        let resp = submit_form(&mut app, b"title=Posted&description=Body");
        assert_redirect_home(&resp);
        assert_eq!(app.posts().len(), 1);
        assert_eq!(app.posts()[0].metadata.author.name, "Ana");
        assert_eq!(app.posts()[0].content.title, "Posted");
        assert_eq!(app.posts()[0].content.description, "Body");
        assert_eq!(app.draft().content.title, "");
        Ok(())
    }

    #[test]
    fn test_submit_write_failure() {
        let storage = FailingStorage::new();
        let mut app = new_app(storage.clone());
        storage.fail_writes(true);

        let resp = submit_form(&mut app, b"title=Lost");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.posts().is_empty());
    }

    #[test]
    fn test_submit_with_unwritable_draft_slot() {
        let storage = FailingStorage::new();
        let mut app = new_app(storage.clone());
        assert_redirect_home(&save_draft(&mut app, b"title=Kept"));

        storage.fail_writes_to(DRAFT_KEY);
        let resp = submit_form(&mut app, b"");
        assert_redirect_home(&resp);
        assert_eq!(app.posts().len(), 1);
        assert_eq!(app.posts()[0].content.title, "Kept");
    }

    #[test]
    fn test_view_and_close() -> io::Result<()> {
        let mut app = new_app(MemoryStorage::new());
        let id = app.submit()?.id;

        assert_redirect_home(&view_post(&mut app, id.0.clone()));
        assert_eq!(app.posts()[0].views, 1);
        assert_eq!(app.modal().snapshot().map(|p| p.views), Some(1));

        assert_redirect_home(&close_modal(&mut app));
        assert!(!app.modal().is_open());
        Ok(())
    }

    #[test]
    fn test_delete() -> io::Result<()> {
        let mut app = new_app(MemoryStorage::new());
        let id = app.submit()?.id;

        assert_redirect_home(&delete_post(&mut app, id.0.clone()));
        assert!(app.posts().is_empty());

        let resp = delete_post(&mut app, id.0);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[test]
    fn test_unknown_post() {
        let mut app = new_app(MemoryStorage::new());
        let resp = view_post(&mut app, "missing".to_string());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(!app.modal().is_open());
    }

    #[test]
    fn test_render_page() -> io::Result<()> {
        let mut app = new_app(MemoryStorage::new());
        app.edit_field(DraftField::Title, "Draft title")?;
        app.submit()?;

        let template_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/template");
        let page = render_page(&template_dir, &app)?;
        assert!(page.contains("Draft title"));

        let err = render_page(Path::new("/nonexistent/template"), &app).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }
}
