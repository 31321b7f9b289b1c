use admission_ai::catalog::{Catalog, Discipline};
use admission_ai::config::{AppConfig, ArtifactConfig};
use admission_ai::error::AppError;
use admission_ai::scoring::{
    recommendation_router, CandidateProfile, MinMaxScaler, PassModel, RecommendationService,
    ScoredMajor, Subject, DEFAULT_THRESHOLD,
};
use admission_ai::telemetry;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "UTBK Major Recommender",
    about = "Estimate admission probabilities and rank university majors",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one candidate against the catalog and print the ranked majors
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Test track: science or humanities
    #[arg(long, value_parser = parse_discipline)]
    discipline: Discipline,
    /// Subject subscore as CODE=VALUE, e.g. --score MAT=850 (repeatable)
    #[arg(long = "score", value_parser = parse_score)]
    scores: Vec<(Subject, f64)>,
    /// Minimum predicted probability for a major to be listed
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
    /// Show at most this many ranked majors
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommend(args),
    }
}

fn parse_discipline(raw: &str) -> Result<Discipline, String> {
    Discipline::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not a discipline (expected science or humanities)"))
}

fn parse_score(raw: &str) -> Result<(Subject, f64), String> {
    let (code, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("'{raw}' is not a CODE=VALUE score"))?;
    let subject =
        Subject::parse(code).ok_or_else(|| format!("'{code}' is not a known subject code"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid score for {subject}: {err}"))?;
    Ok((subject, value))
}

/// Loads the catalog and inference artifacts from their configured
/// locations. Any failure here is fatal; the session never proceeds with
/// partial data.
fn load_service(artifacts: &ArtifactConfig) -> Result<RecommendationService, AppError> {
    let catalog = Catalog::from_paths(&artifacts.majors_path, &artifacts.universities_path)?;
    let scaler = MinMaxScaler::from_path(&artifacts.scaler_path)?;
    let model = PassModel::from_path(&artifacts.model_path)?;

    info!(majors = catalog.len(), "catalog and artifacts loaded");

    Ok(RecommendationService::new(
        Arc::new(catalog),
        Arc::new(scaler),
        Arc::new(model),
    ))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(load_service(&config.artifacts)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = recommendation_router(service)
        .merge(ops)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "major recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        discipline,
        scores,
        threshold,
        limit,
    } = args;

    let config = AppConfig::load()?;
    let service = load_service(&config.artifacts)?;

    let profile = CandidateProfile {
        discipline,
        scores: scores.into_iter().collect::<BTreeMap<Subject, f64>>(),
    };

    let ranked = service.recommend(&profile, threshold)?;
    render_recommendations(discipline, threshold, &ranked, limit);

    Ok(())
}

fn render_recommendations(
    discipline: Discipline,
    threshold: f64,
    ranked: &[ScoredMajor],
    limit: Option<usize>,
) {
    println!("Major recommendations ({discipline}, threshold {threshold:.2})");

    if ranked.is_empty() {
        println!("No majors reached the probability threshold.");
        return;
    }

    let shown = limit.unwrap_or(ranked.len()).min(ranked.len());
    for (rank, entry) in ranked.iter().take(shown).enumerate() {
        let university = entry.university_name.as_deref().unwrap_or("-");
        println!(
            "{:>2}. {} | {} | p={:.3} | UTBK seats {}/{}",
            rank + 1,
            entry.major_name,
            university,
            entry.prob_pass,
            entry.utbk_capacity,
            entry.capacity
        );
    }

    if shown < ranked.len() {
        println!("... and {} more above the threshold", ranked.len() - shown);
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
