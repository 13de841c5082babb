use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Point {
    date: String,
    downloads: u64,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    arch: String,
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    total: u64,
    average_per_day: f64,
}

#[derive(Debug, Deserialize)]
struct DatasetsResponse {
    #[serde(rename = "ref")]
    ref_id: String,
    interval: String,
    granularity: u32,
    #[serde(rename = "downloadType")]
    download_type: String,
    fragment: String,
    min_date: Option<String>,
    datasets: Vec<Dataset>,
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    min_date: Option<String>,
    summary: Option<Summary>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

const REFS: &[&str] = &[
    "app/org.example.Clock",
    "app/org.example.Maps",
    "app/org.example.Missing",
];

const CLOCK_SERIES: &str = r#"{
  "stats": [
    { "date": "2024-01-01", "arches": { "x64": [10, 2] } },
    { "date": "2024-01-02", "arches": { "x64": [5, 1], "aarch64": [3, 1] } }
  ]
}"#;

const MAPS_SERIES: &str = r#"{
  "stats": [
    { "date": "2024-02-01", "arches": { "x64": [7, 3] } }
  ]
}"#;

fn write_fixture() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut dir = std::env::temp_dir();
    dir.push(format!("download_stats_http_{}_{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).expect("create fixture dir");

    std::fs::write(
        dir.join("refs.json"),
        serde_json::to_vec(&REFS).expect("encode refs"),
    )
    .expect("write refs manifest");
    std::fs::write(dir.join("app_org.example.Clock.json"), CLOCK_SERIES)
        .expect("write clock series");
    std::fs::write(dir.join("app_org.example.Maps.json"), MAPS_SERIES).expect("write maps series");
    // app/org.example.Missing deliberately has no series file.

    dir
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/refs")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_dir = write_fixture();
    let child = Command::new(env!("CARGO_BIN_EXE_download_stats"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", &data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_refs_lists_manifest_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let refs: Vec<String> = client
        .get(format!("{}/api/refs", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(refs, REFS);
}

#[tokio::test]
async fn http_datasets_defaults_and_canonical_fragment() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: DatasetsResponse = client
        .get(format!(
            "{}/api/datasets?ref=app%2Forg.example.Clock&interval=infinity&granularity=1&downloadType=installs%2Bupdates",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.ref_id, "app/org.example.Clock");
    assert_eq!(body.interval, "infinity");
    assert_eq!(body.granularity, 1);
    assert_eq!(body.download_type, "installs+updates");
    // All defaults collapse out of the canonical fragment.
    assert_eq!(body.fragment, "ref=app%2Forg.example.Clock");
    assert_eq!(body.min_date, None);

    assert_eq!(body.datasets.len(), 2);
    assert_eq!(body.datasets[0].arch, "x64");
    assert_eq!(body.datasets[0].points.len(), 2);
    assert_eq!(body.datasets[1].arch, "aarch64");
    assert_eq!(body.datasets[1].points.len(), 1);

    let summary = body.summary.expect("summary present");
    assert_eq!(summary.total, 10 + 5 + 3);
    assert!(summary.average_per_day > 0.0);
}

#[tokio::test]
async fn http_datasets_bucketed_installs() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: DatasetsResponse = client
        .get(format!(
            "{}/api/datasets?ref=app%2Forg.example.Clock&granularity=2&downloadType=installs",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body.fragment,
        "ref=app%2Forg.example.Clock&granularity=2&downloadType=installs"
    );
    let x64 = body.datasets.iter().find(|d| d.arch == "x64").unwrap();
    assert_eq!(x64.points.len(), 1);
    assert_eq!(x64.points[0].date, "2024-01-01");
    assert_eq!(x64.points[0].downloads, (10 - 2) + (5 - 1));
}

#[tokio::test]
async fn http_unknown_ref_falls_back_to_first() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: DatasetsResponse = client
        .get(format!(
            "{}/api/datasets?ref=app%2Forg.example.Nonexistent",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.ref_id, "app/org.example.Clock");
}

#[tokio::test]
async fn http_missing_series_file_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/api/datasets?ref=app%2Forg.example.Missing",
            server.base_url
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_summary_window_excludes_old_points() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: SummaryResponse = client
        .get(format!(
            "{}/api/summary?ref=app%2Forg.example.Maps&interval=30",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The fixture's points are far in the past, so a 30-day window has no
    // data and the summary reports that instead of a NaN average.
    assert!(body.min_date.is_some());
    assert!(body.summary.is_none());
}

#[tokio::test]
async fn http_summary_unbounded_totals_everything() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: SummaryResponse = client
        .get(format!(
            "{}/api/summary?ref=app%2Forg.example.Maps",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.min_date, None);
    let summary = body.summary.expect("summary present");
    assert_eq!(summary.total, 7);
    assert!(summary.average_per_day > 0.0);
}
