//! Directory-backed asset store
//!
//! Maps URL paths onto files below a root directory, with index file
//! support for directory paths and `ETag` revalidation. A directory
//! addressed without a trailing slash is redirected to the slash form so
//! relative links inside its index resolve against the directory.

use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::{AssetRequest, AssetResponse, AssetStore};
use crate::http::{self, cache, mime};
use crate::logger;

/// Outcome of mapping a URL path onto the asset directory
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    /// A directory addressed without its trailing slash
    AddSlash,
    Missing,
}

/// Decode a URL path into a relative filesystem path
///
/// Returns `None` for invalid UTF-8, `..` segments, and segments that decode
/// to a separator or NUL.
fn decode_path(url_path: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for raw in url_path.split('/') {
        let segment = percent_decode_str(raw).decode_utf8().ok()?;
        match segment.as_ref() {
            "" | "." => {}
            ".." => return None,
            s if s.contains(['/', '\\', '\0']) => return None,
            s => path.push(s),
        }
    }
    // Reject anything the platform would not read as a plain name
    let plain = path.components().all(|c| matches!(c, Component::Normal(_)));
    plain.then_some(path)
}

/// Asset store serving files from a local directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    index_files: Vec<String>,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, which must be an existing directory
    pub fn open(root: impl AsRef<Path>, index_files: Vec<String>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("asset directory '{}': {e}", root.as_ref().display()),
            )
        })?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("asset directory '{}' is not a directory", root.display()),
            ));
        }
        Ok(Self { root, index_files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a URL path against the root
    ///
    /// Each segment is percent-decoded on its own, so an encoded `/` can
    /// never introduce a new path component.
    async fn resolve(&self, url_path: &str) -> Resolved {
        let Some(relative_path) = decode_path(url_path) else {
            logger::log_debug(&format!("Rejected asset path: {url_path}"));
            return Resolved::Missing;
        };

        let mut candidate = self.root.join(&relative_path);
        let is_dir = fs::metadata(&candidate).await.is_ok_and(|m| m.is_dir());
        if is_dir && !url_path.ends_with('/') {
            return Resolved::AddSlash;
        }
        if is_dir || url_path.ends_with('/') {
            match self.find_index(&candidate).await {
                Some(index) => candidate = index,
                None => return Resolved::Missing,
            }
        }

        // Missing files are the common 404 case
        let Ok(canonical) = fs::canonicalize(&candidate).await else {
            return Resolved::Missing;
        };
        if !canonical.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                url_path,
                canonical.display()
            ));
            return Resolved::Missing;
        }

        if fs::metadata(&canonical).await.is_ok_and(|m| m.is_file()) {
            Resolved::File(canonical)
        } else {
            Resolved::Missing
        }
    }

    async fn find_index(&self, dir: &Path) -> Option<PathBuf> {
        for index_file in &self.index_files {
            let index_path = dir.join(index_file);
            if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
                return Some(index_path);
            }
        }
        None
    }
}

impl AssetStore for DirectoryStore {
    async fn fetch(&self, request: &AssetRequest) -> io::Result<AssetResponse> {
        let path = match self.resolve(request.path()).await {
            Resolved::File(path) => path,
            Resolved::AddSlash => {
                let location = match request.url().query() {
                    Some(query) => format!("{}/?{query}", request.path()),
                    None => format!("{}/", request.path()),
                };
                return Ok(http::build_redirect_response(&location));
            }
            Resolved::Missing => return Ok(http::build_404_response()),
        };

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(http::build_404_response());
            }
            Err(e) => {
                return Err(io::Error::new(
                    e.kind(),
                    format!("reading '{}': {e}", path.display()),
                ));
            }
        };

        let etag = cache::generate_etag(&content);
        if cache::check_etag_match(request.header("if-none-match"), &etag) {
            return Ok(http::build_304_response(&etag));
        }

        let is_head = request.method() == hyper::Method::HEAD;
        Ok(http::build_asset_response(
            content,
            mime::content_type_for(&path),
            &etag,
            is_head,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::{HeaderMap, Method, StatusCode, Uri};
    use std::fs as std_fs;

    fn site() -> (tempfile::TempDir, DirectoryStore) {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std_fs::create_dir_all(dir.path().join("docs")).unwrap();
        std_fs::write(dir.path().join("docs/index.htm"), "<h1>docs</h1>").unwrap();
        std_fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        std_fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
        std_fs::create_dir_all(dir.path().join("drugs/咖啡因")).unwrap();
        std_fs::write(dir.path().join("drugs/咖啡因/index.html"), "<h1>咖啡因</h1>").unwrap();
        let store = DirectoryStore::open(
            dir.path(),
            vec!["index.html".to_string(), "index.htm".to_string()],
        )
        .unwrap();
        (dir, store)
    }

    fn get(path: &str) -> AssetRequest {
        AssetRequest::get(format!("http://localhost{path}").parse::<Uri>().unwrap())
    }

    async fn body(response: AssetResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type() {
        let (_dir, store) = site();
        let response = store.fetch(&get("/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/javascript; charset=utf-8"
        );
        assert!(response.headers().contains_key("etag"));
        assert_eq!(body(response).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_directory_paths_use_index_files() {
        let (_dir, store) = site();
        let root = store.fetch(&get("/")).await.unwrap();
        assert_eq!(body(root).await, "<h1>home</h1>");

        let docs = store.fetch(&get("/docs/")).await.unwrap();
        assert_eq!(docs.status(), StatusCode::OK);
        assert_eq!(body(docs).await, "<h1>docs</h1>");
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let (_dir, store) = site();
        let response = store.fetch(&get("/docs")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/docs/");

        let response = store.fetch(&get("/docs?tab=api")).await.unwrap();
        assert_eq!(response.headers()["location"], "/docs/?tab=api");
    }

    #[tokio::test]
    async fn test_percent_encoded_names_are_decoded() {
        let (_dir, store) = site();
        let spaced = store.fetch(&get("/my%20file.txt")).await.unwrap();
        assert_eq!(spaced.status(), StatusCode::OK);
        assert_eq!(body(spaced).await, "spaced");

        let page = store
            .fetch(&get("/drugs/%E5%92%96%E5%95%A1%E5%9B%A0/"))
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert_eq!(body(page).await, "<h1>咖啡因</h1>");

        let redirect = store
            .fetch(&get("/drugs/%E5%92%96%E5%95%A1%E5%9B%A0"))
            .await
            .unwrap();
        assert_eq!(
            redirect.headers()["location"],
            "/drugs/%E5%92%96%E5%95%A1%E5%9B%A0/"
        );
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_rejected() {
        let (_dir, store) = site();
        for path in [
            "/%2e%2e/outside.txt",
            "/docs/%2E%2E/%2e%2e/etc/passwd",
            "/docs%2F..%2F..%2Fetc%2Fpasswd",
            "/app.js%00.png",
            "/%FF%FE",
        ] {
            let response = store.fetch(&get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/"), Some(PathBuf::new()));
        assert_eq!(
            decode_path("/a/./b%20c//d"),
            Some(PathBuf::from("a").join("b c").join("d"))
        );
        assert_eq!(decode_path("/a/%2e%2e/b"), None);
        assert_eq!(decode_path("/a%2fb"), None);
        assert_eq!(decode_path("/a%5cb"), None);
        assert_eq!(decode_path("/nul%00"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let (_dir, store) = site();
        let response = store.fetch(&get("/blog/post-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parent_segments_are_rejected() {
        let (_dir, store) = site();
        for path in ["/../outside.txt", "/docs/../../etc/passwd"] {
            let response = store.fetch(&get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_blocked() {
        let (dir, store) = site();
        let outside = tempfile::tempdir().unwrap();
        std_fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("leak.txt"),
        )
        .unwrap();

        let response = store.fetch(&get("/leak.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_matching_etag_yields_304() {
        let (_dir, store) = site();
        let first = store.fetch(&get("/app.js")).await.unwrap();
        let etag = first.headers()["etag"].clone();

        let mut headers = HeaderMap::new();
        headers.insert("if-none-match", etag);
        let revalidate = AssetRequest::new(
            Method::GET,
            Uri::from_static("http://localhost/app.js"),
            headers,
        );
        let response = store.fetch(&revalidate).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_has_empty_body() {
        let (_dir, store) = site();
        let head = AssetRequest::new(
            Method::HEAD,
            Uri::from_static("http://localhost/app.js"),
            HeaderMap::new(),
        );
        let response = store.fetch(&head).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-length"], "14");
        assert!(body(response).await.is_empty());
    }

    #[test]
    fn test_open_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(DirectoryStore::open(&missing, vec![]).is_err());
    }

    #[test]
    fn test_open_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std_fs::write(&file, "x").unwrap();
        let err = DirectoryStore::open(&file, vec![]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
