use academy_bridge_config::Config;
use academy_bridge_engine::parsing::snapshot;
use academy_bridge_engine::{
    ArticleId, ArticleMetadata, ConvertedArticle, Corpus, Diagnostics, Document, Footnotes,
    GraphBuild, RelationshipConfig, RelationshipEdge, ResolvedLink, TsvTable, build_graph,
    convert_corpus, io,
};
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "academy-bridge")]
#[command(version, about = "Convert Translation Academy articles and link them into a graph", long_about = None)]
struct Cli {
    /// Corpus checkout to read (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the converted block tree of one article
    Convert {
        /// Article id, e.g. translate/figs-metaphor
        #[arg(value_name = "ARTICLE_ID")]
        id: String,
    },
    /// Print relationship edges and link counts
    Graph,
    /// Print every diagnostic
    Check {
        /// Exit non-zero when any error-level diagnostic is found
        #[arg(long)]
        strict: bool,
    },
    /// Write documents, graph, metadata and diagnostics as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Everything loaded and converted for one run.
struct Pipeline {
    corpus: Corpus,
    relationships: RelationshipConfig,
    converted: BTreeMap<ArticleId, ConvertedArticle>,
    tsv: Option<TsvTable>,
}

impl Pipeline {
    fn load(config: &Config) -> Result<Self> {
        let root = &config.corpus_path;
        let mut corpus = io::load_corpus(root, &config.sections)
            .with_context(|| format!("Failed to load corpus from {}", root.display()))?;
        corpus.retain(|article| config.selects(&article.id));

        let mut relationships = io::load_relationships(root, &config.sections)
            .with_context(|| format!("Failed to load relationships from {}", root.display()))?;
        relationships.retain_sources(|id| config.selects(id));

        let tsv = match &config.tsv_path {
            Some(path) => Some(
                io::read_tsv(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            ),
            None => None,
        };

        let converted = convert_corpus(&corpus);
        Ok(Self {
            corpus,
            relationships,
            converted,
            tsv,
        })
    }

    fn build(&self) -> GraphBuild<'_> {
        build_graph(&self.corpus, &self.converted, &self.relationships)
    }

    /// Conversion and graph diagnostics together, sorted.
    fn diagnostics(&self, build: &GraphBuild<'_>) -> Diagnostics {
        let mut all = Diagnostics::new();
        for converted in self.converted.values() {
            all.extend(converted.diagnostics.clone());
        }
        all.extend(build.diagnostics.clone());
        all.sort();
        all
    }
}

#[derive(Serialize)]
struct ExportedArticle<'a> {
    metadata: ArticleMetadata,
    document: &'a Document,
    footnotes: &'a Footnotes,
}

#[derive(Serialize)]
struct Export<'a> {
    articles: BTreeMap<&'a ArticleId, ExportedArticle<'a>>,
    edges: Vec<&'a RelationshipEdge>,
    links: Vec<&'a ResolvedLink>,
    diagnostics: Diagnostics,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let loaded = Config::load_from_path(&config_path)
        .with_context(|| format!("Failed to load config file {}", config_path.display()))?;

    init_logging(cli.verbose, loaded.as_ref());
    log::debug!("Config path: {}", config_path.display());

    let config = match (cli.corpus.clone(), loaded) {
        (Some(corpus), Some(mut config)) => {
            config.corpus_path = corpus;
            config
        }
        (Some(corpus), None) => Config::new(corpus),
        (None, Some(config)) => config,
        (None, None) => bail!(
            "No corpus path provided and no config file found; pass --corpus or create {}",
            config_path.display()
        ),
    };
    log::info!("Using corpus at {}", config.corpus_path.display());

    let pipeline = Pipeline::load(&config)?;
    match cli.command {
        Command::Convert { id } => convert(&pipeline, &ArticleId::from(id.as_str())),
        Command::Graph => graph(&pipeline),
        Command::Check { strict } => check(&pipeline, strict),
        Command::Export { out } => export(&pipeline, out),
    }
}

fn init_logging(verbose: u8, config: Option<&Config>) {
    let level = match verbose {
        0 => config
            .and_then(|c| c.log_level.as_deref())
            .and_then(|l| l.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_default_env();
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn convert(pipeline: &Pipeline, id: &ArticleId) -> Result<ExitCode> {
    let Some(converted) = pipeline.converted.get(id) else {
        bail!("Unknown article {id}");
    };
    let build = pipeline.build();
    let document = build
        .documents
        .get(id)
        .unwrap_or(&converted.document)
        .with_footnote_appendix(&converted.footnotes);

    print!("{}", snapshot::outline(&document));
    for diagnostic in converted
        .diagnostics
        .iter()
        .chain(build.diagnostics.iter().filter(|d| d.article.as_ref() == Some(id)))
    {
        eprintln!("{diagnostic}");
    }
    Ok(ExitCode::SUCCESS)
}

fn graph(pipeline: &Pipeline) -> Result<ExitCode> {
    let build = pipeline.build();
    for edge in build.graph.edges() {
        println!("{} -[{:?}]-> {}", edge.from, edge.kind, edge.to);
    }
    println!(
        "{} articles, {} edges, {} resolved links, {} problems",
        pipeline.corpus.len(),
        build.graph.edge_count(),
        build.graph.link_count(),
        build.diagnostics.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn check(pipeline: &Pipeline, strict: bool) -> Result<ExitCode> {
    let build = pipeline.build();
    let diagnostics = pipeline.diagnostics(&build);
    for diagnostic in &diagnostics {
        println!("{diagnostic}");
    }
    println!("{} diagnostics", diagnostics.len());

    if strict && diagnostics.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn export(pipeline: &Pipeline, out: Option<PathBuf>) -> Result<ExitCode> {
    let build = pipeline.build();

    let articles = pipeline
        .corpus
        .articles()
        .filter_map(|article| {
            let converted = pipeline.converted.get(&article.id)?;
            let mut metadata = ArticleMetadata::derive(article, &build.graph);
            if let Some(tsv) = &pipeline.tsv {
                metadata = metadata.with_tsv(tsv);
            }
            Some((
                &article.id,
                ExportedArticle {
                    metadata,
                    document: build.documents.get(&article.id)?,
                    footnotes: &converted.footnotes,
                },
            ))
        })
        .collect();

    let export = Export {
        articles,
        edges: build.graph.edges().collect(),
        links: build.graph.links().collect(),
        diagnostics: pipeline.diagnostics(&build),
    };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialise export")?;

    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}
