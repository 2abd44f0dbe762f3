use std::sync::Arc;

use clap::Args;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use revfs_store::RevStore;
use revfs_view::{Handle, Snapshot, Stat, ViewError};

use crate::config::open_store;
use crate::http::{read_request, write_response, Response};
use crate::output::http_date;

const LISTING_BATCH: isize = 64;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (default: [serve].listen from repo.toml)
    #[arg(long)]
    listen: Option<String>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let store = Arc::new(open_store()?);
    let listen = args
        .listen
        .unwrap_or_else(|| store.config().serve.listen.clone());
    let text_extensions: Arc<[String]> = store.config().serve.text_extensions.clone().into();

    let listener = TcpListener::bind(&listen).await?;
    tracing::info!(addr = %listener.local_addr()?, root = %store.root().display(), "serving repository");
    println!("Listening on http://{}/tree/", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        let store = Arc::clone(&store);
        let text_extensions = Arc::clone(&text_extensions);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, store, text_extensions).await {
                tracing::warn!(%peer, error = %e, "connection failed");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    store: Arc<RevStore>,
    text_extensions: Arc<[String]>,
) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let request = match read_request(&mut reader).await {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(e) => {
            let response = Response::text(400, format!("{e}\n"));
            write_response(&mut write_half, response, false).await?;
            return Ok(());
        }
    };

    let head_only = request.method == "HEAD";
    let response = if request.method != "GET" && !head_only {
        Response::text(405, "method not allowed\n").header("Allow", "GET, HEAD")
    } else {
        let target = request.target.clone();
        tokio::task::spawn_blocking(move || respond(&store, &target, &text_extensions)).await?
    };

    tracing::info!(
        method = %request.method,
        url = %request.target,
        status = response.status,
        "request"
    );
    write_response(&mut write_half, response, head_only).await?;
    Ok(())
}

/// A `/tree/{revision}/{path...}` request, percent-decoded.
#[derive(Debug, PartialEq, Eq)]
struct TreeRequest {
    revision: String,
    path: String,
    trailing_slash: bool,
}

fn parse_target(target: &str) -> Option<TreeRequest> {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let rest = path.strip_prefix("/tree/")?;
    let (revision, file_path) = rest.split_once('/').unwrap_or((rest, ""));
    let revision = urlencoding::decode(revision).ok()?.into_owned();
    if revision.is_empty() {
        return None;
    }
    let segments = file_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).map(|d| d.into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(TreeRequest {
        revision,
        path: segments.join("/"),
        trailing_slash: path.ends_with('/'),
    })
}

fn status_for(err: &ViewError) -> u16 {
    match err {
        ViewError::NotExist(_) | ViewError::RevisionNotFound(_) | ViewError::InvalidPath(_) => 404,
        ViewError::PermissionDenied { .. } => 403,
        _ => 500,
    }
}

fn content_type(name: &str, text_extensions: &[String]) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "application/octet-stream",
    };
    if text_extensions.iter().any(|t| t.eq_ignore_ascii_case(&ext)) {
        return "text/plain; charset=utf-8";
    }
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn respond(store: &RevStore, target: &str, text_extensions: &[String]) -> Response {
    let Some(request) = parse_target(target) else {
        return Response::text(404, "not found\n");
    };
    match render(store, &request, target, text_extensions) {
        Ok(response) => response,
        Err(e) => {
            let status = status_for(&e);
            if status == 500 {
                tracing::warn!(url = target, error = %e, "request failed");
            }
            Response::text(status, format!("{e}\n"))
        }
    }
}

fn render(
    store: &RevStore,
    request: &TreeRequest,
    target: &str,
    text_extensions: &[String],
) -> Result<Response, ViewError> {
    let snapshot = Snapshot::resolve(store, &request.revision)?;
    match snapshot.open(&request.path)? {
        Handle::File(file) => {
            let info = file.stat().clone();
            Ok(Response::new(200)
                .header("Content-Type", content_type(info.name(), text_extensions))
                .header("Content-Length", info.size().to_string())
                .header("Last-Modified", http_date(info.mod_time()))
                .stream(info.size(), file))
        }
        Handle::Dir(dir) => {
            if !request.trailing_slash {
                let location = format!("{}/", target.split(['?', '#']).next().unwrap_or_default());
                dir.close();
                return Ok(Response::new(301).header("Location", location));
            }
            let index = if request.path.is_empty() {
                "index.html".to_string()
            } else {
                format!("{}/index.html", request.path)
            };
            match snapshot.stat(&index) {
                Ok(info) if !info.is_dir() => {
                    dir.close();
                    let body = snapshot.read_file(&index)?;
                    return Ok(Response::new(200)
                        .header("Content-Type", "text/html; charset=utf-8")
                        .header("Last-Modified", http_date(info.mod_time()))
                        .body(body));
                }
                Ok(_) => {}
                Err(e) if e.is_not_exist() => {}
                Err(e) => return Err(e),
            }
            render_listing(Handle::Dir(dir))
        }
    }
}

fn render_listing<G>(mut dir: Handle<'_, G>) -> Result<Response, ViewError>
where
    G: revfs_view::ObjectGraph + revfs_view::HistoryWalk,
{
    let title = escape_html(dir.stat().path());
    let mut html = format!("<!doctype html>\n<title>{title}</title>\n<h1>{title}</h1>\n<pre>\n");
    while let Some(batch) = dir.read_entries(LISTING_BATCH)? {
        for info in batch {
            let suffix = if info.is_dir() { "/" } else { "" };
            let name = format!("{}{suffix}", info.name());
            html.push_str(&format!(
                "<a href=\"{}{suffix}\">{}</a>\n",
                urlencoding::encode(info.name()),
                escape_html(&name)
            ));
        }
    }
    html.push_str("</pre>\n");
    let modified = http_date(dir.stat().mod_time());
    dir.close();
    Ok(Response::new(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Last-Modified", modified)
        .body(html.into_bytes()))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
