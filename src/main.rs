use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use iris::cli::output::Output;
use iris::cli::{Cli, Commands};
use iris::{
    ConfigManager, CoverageGapAnalyzer, DaedraSearchProvider, IrisConfig, IterationController,
    Preset, SearchProvider, StaticSearchProvider,
};

const CONFIG_TEMPLATE: &str = r#"# I.R.I.S configuration
#
# A preset selects a bundled parameter set; the [merger] and [iteration]
# tables, when present, replace the corresponding preset section wholesale.
# Presets: balanced, conservative, aggressive, performance, quality.

preset = "balanced"

# Re-read this file at each iteration boundary of a running session.
enable_runtime_switching = false

# [merger]
# similarity_threshold = 0.7
# min_content_length = 50
# max_merged_results = 10
# max_sentences_per_result = 8
# max_key_points = 3
# quality_threshold = 0.6
# confidence_weight = 0.4
# relevance_weight = 0.4
# content_quality_weight = 0.2
# enable_semantic_grouping = true
# enable_deduplication = true
# enable_quality_filtering = true
# enable_similarity_cache = true
# max_cache_size = 1000
# preserve_source_info = true

# [iteration]
# max_follow_up_iterations = 3
# max_queries_per_iteration = 3
# max_total_reflections = 8
# sufficiency_threshold = 0.7
# follow_up_delay_seconds = 1.0
# query_timeout_seconds = 30
# max_search_results = 3
# enable_parallel_follow_up = true
# reset_counter_on_new_task = true
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    let default_filter = if cli.verbose { "iris=debug" } else { "iris=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Run {
            topic,
            offline,
            preset,
            json,
        } => run_session(&cli.config, &topic, offline, preset, json, &out).await,
        Commands::Config { full, validate } => show_config(&cli.config, full, validate, &out),
        Commands::Init { path, force } => init_config(&path, force, &out),
    }
}

async fn run_session(
    config_path: &Path,
    topic: &str,
    offline: bool,
    preset: Option<String>,
    json: bool,
    out: &Output,
) -> anyhow::Result<()> {
    let manager = Arc::new(ConfigManager::new(config_path)?);
    if let Some(name) = preset {
        let preset: Preset = name.parse()?;
        manager.switch_preset(preset);
    }
    if manager.config().enable_runtime_switching {
        manager.start_watching()?;
    }

    let provider: Arc<dyn SearchProvider> = if offline {
        Arc::new(StaticSearchProvider::empty())
    } else {
        Arc::new(DaedraSearchProvider::new())
    };
    let analyzer = Arc::new(CoverageGapAnalyzer::new());

    // Seed the session with an initial round on the topic itself.
    let limit = manager.config().iteration.max_search_results;
    let initial = match provider.search(topic, limit).await {
        Ok(records) => records,
        Err(e) => {
            out.warning(&format!("Initial search failed, starting empty: {e}"));
            Vec::new()
        }
    };

    let mut controller =
        IterationController::new(Arc::clone(&manager), Arc::clone(&provider), analyzer)?;

    let cancel = controller.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = controller.run(topic, initial).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    out.banner();
    out.heading(&format!("Research: {topic}"));
    out.info(&format!(
        "{} results, {} iterations, {} queries, coverage {:.0}%, {} ms",
        outcome.results.len(),
        outcome.state.iteration,
        outcome.state.queries_issued,
        outcome.verdict.coverage * 100.0,
        outcome.duration_ms
    ));
    if !outcome.verdict.sufficient {
        out.warning("Terminated by iteration/query caps before full coverage");
        for area in &outcome.verdict.priority_areas {
            out.detail(&format!("unresolved: {area}"));
        }
    }
    println!();

    for (i, result) in outcome.results.iter().enumerate() {
        out.heading(&format!(
            "{}. [{:.2}] {}",
            i + 1,
            result.quality_score,
            result.content
        ));
        for point in &result.key_points {
            out.detail(&format!("- {point}"));
        }
        for source in &result.sources {
            out.detail(source);
        }
        println!();
    }

    let stats = &outcome.statistics;
    out.info(&format!(
        "compression {:.1}x over {} source records, {} distinct sources",
        stats.compression_ratio, stats.total_original_results, stats.source_diversity
    ));

    Ok(())
}

fn show_config(config_path: &Path, full: bool, validate: bool, out: &Output) -> anyhow::Result<()> {
    let config = IrisConfig::load_or_default(config_path)?;

    if validate {
        config.validate()?;
        out.success(&format!("{} is valid", config_path.display()));
    }

    out.info(&format!("active preset: {}", config.preset));
    if full {
        let rendered =
            toml::to_string_pretty(&config).context("failed to render configuration")?;
        println!("{rendered}");
    }

    Ok(())
}

fn init_config(path: &Path, force: bool, out: &Output) -> anyhow::Result<()> {
    let target = path.join("iris.toml");
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory {}", path.display()))?;
    fs::write(&target, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", target.display()))?;

    out.success(&format!("Wrote {}", target.display()));
    out.info("Edit the preset or uncomment sections, then run: iris run \"<topic>\"");
    Ok(())
}
