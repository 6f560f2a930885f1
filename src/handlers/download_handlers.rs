use axum::{
    body::{self, Body},
    extract::Path,
    http::{header::CONTENT_DISPOSITION, HeaderValue, Method, Request},
    response::Response,
    Extension,
};
use hyper::StatusCode;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    error::AppError,
    services::download_service::{self, ResolvedFile},
};

/// GET /download/:file_type/
///
/// Streams one of the whitelisted static files as an attachment. Every
/// failure, whatever its cause, is answered with 404.
pub async fn download_static_file(
    Extension(state): Extension<AppState>,
    Path(file_type): Path<String>,
    method: Method,
) -> Result<Response, AppError> {
    let file = download_service::resolve(&file_type, &state.settings)
        .await
        .ok_or(AppError::NotFound)?;

    let response = serve_attachment(&file, method).await?;
    info!("Serving download {} ({})", file.filename, file_type);
    Ok(response)
}

// The client's range and conditional headers are not forwarded: the file is
// always sent whole, and anything but a 200 from `ServeFile` is a 404.
async fn serve_attachment(file: &ResolvedFile, method: Method) -> Result<Response, AppError> {
    let request = Request::builder()
        .method(method)
        .body(Body::empty())
        .map_err(|_| AppError::NotFound)?;

    let response = match ServeFile::new(&file.path).oneshot(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to serve {}: {}", file.path.display(), e);
            return Err(AppError::NotFound);
        }
    };
    if response.status() != StatusCode::OK {
        warn!("Serving {} answered {}", file.path.display(), response.status());
        return Err(AppError::NotFound);
    }

    let disposition =
        HeaderValue::from_str(&file.content_disposition()).map_err(|_| AppError::NotFound)?;
    let mut response = response.map(body::boxed);
    response.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use axum::http::header::{CONTENT_RANGE, IF_MODIFIED_SINCE, RANGE};

    use super::*;
    use crate::{
        routes::app_routes::create_router,
        test_support::{
            json_request, send, settings_with_static_dirs, state_with_static_dirs, TempStaticDirs,
            APP_FILE_BODY, PROJECT_FILE_BODY,
        },
    };

    #[tokio::test]
    async fn project_file_is_served_as_attachment() {
        let dirs = TempStaticDirs::with_files();
        let app = create_router(state_with_static_dirs(&dirs));

        let (status, headers, body) =
            send(&app, json_request(Method::GET, "/download/project/", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[CONTENT_DISPOSITION],
            "attachment; filename=\"project_wide.txt\""
        );
        assert_eq!(&body[..], PROJECT_FILE_BODY.as_bytes());
    }

    #[tokio::test]
    async fn app_file_is_served_as_attachment() {
        let dirs = TempStaticDirs::with_files();
        let app = create_router(state_with_static_dirs(&dirs));

        let (status, headers, body) = send(&app, json_request(Method::GET, "/download/app/", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_DISPOSITION], "attachment; filename=\"example.txt\"");
        assert_eq!(&body[..], APP_FILE_BODY.as_bytes());
    }

    #[tokio::test]
    async fn unknown_file_type_is_not_found() {
        let dirs = TempStaticDirs::with_files();
        let app = create_router(state_with_static_dirs(&dirs));

        for uri in ["/download/secrets/", "/download/PROJECT/", "/download/..%2F..%2Fetc/"] {
            let (status, headers, _) = send(&app, json_request(Method::GET, uri, None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(headers.get(CONTENT_DISPOSITION).is_none());
        }
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dirs = TempStaticDirs::empty();
        let app = create_router(state_with_static_dirs(&dirs));

        for uri in ["/download/project/", "/download/app/"] {
            let (status, headers, _) = send(&app, json_request(Method::GET, uri, None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(headers.get(CONTENT_DISPOSITION).is_none());
        }
    }

    #[tokio::test]
    async fn range_requests_get_the_whole_file() {
        let dirs = TempStaticDirs::with_files();
        let app = create_router(state_with_static_dirs(&dirs));

        for range in ["bytes=0-3", "bytes=9999-10000"] {
            let request = Request::builder()
                .uri("/download/project/")
                .header(RANGE, range)
                .body(Body::empty())
                .unwrap();

            let (status, headers, body) = send(&app, request).await;

            assert_eq!(status, StatusCode::OK, "{range}");
            assert!(headers.get(CONTENT_RANGE).is_none());
            assert_eq!(&body[..], PROJECT_FILE_BODY.as_bytes());
        }
    }

    #[tokio::test]
    async fn conditional_headers_do_not_skip_the_body() {
        let dirs = TempStaticDirs::with_files();
        let app = create_router(state_with_static_dirs(&dirs));
        let request = Request::builder()
            .uri("/download/app/")
            .header(IF_MODIFIED_SINCE, "Fri, 01 Jan 2100 00:00:00 GMT")
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], APP_FILE_BODY.as_bytes());
    }

    #[tokio::test]
    async fn non_success_from_file_service_is_not_found() {
        let dirs = TempStaticDirs::with_files();
        let file = download_service::resolve("project", &settings_with_static_dirs(&dirs))
            .await
            .unwrap();

        // ServeFile answers 405 for anything but GET and HEAD.
        let response = serve_attachment(&file, Method::POST).await;

        assert!(matches!(response, Err(AppError::NotFound)));
    }
}
