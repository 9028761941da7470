//! Command-line interface for the modelgraph utility
//!
//! Provides a CLI to validate domain model documents and turn them into
//! property-graph schemas, PlantUML / DOT diagrams, SQL and XMI.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::colorizer::{self, diagnostic, ColorChoice, Severity};
use modelgraph::core::logging::init_logging;
use modelgraph::core::{DiagramSource, DirectionMap, Emitter, EmitterConfig};
use modelgraph::model::{DomainModel, ModelDocument};
use modelgraph::plugins::graph::{convert, Conversion, DotEmitter, GraphEmitter};
use modelgraph::plugins::instance::{generate_instances, InstanceEmitter, InstanceGraph};
use modelgraph::plugins::orchestrator::{LayoutEngine, Pipeline, PipelineOptions, PipelineOutput};
use modelgraph::plugins::relational::{ddl, orm_tables};
use modelgraph::plugins::uml::UmlEmitter;
use modelgraph::plugins::xmi::export_xmi;

/// Modelgraph - Turn UML-style domain models into property graphs and diagrams
#[derive(Parser)]
#[command(name = "modelgraph")]
#[command(about = "Convert YAML/JSON domain models into graph schemas, PlantUML diagrams and SQL")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// TOML file with [emitter] and [pipeline] settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// When to color warnings on stderr
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Input and output locations shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct IoArgs {
    /// Model document, YAML or JSON (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Two-pass rendering options
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Run both passes through the external renderer and write the final artifact
    #[arg(long)]
    pub render: bool,

    /// With --render, write the resolved pass-two text instead of the artifact
    #[arg(long, requires = "render")]
    pub text_only: bool,

    /// Layout engine used for both passes
    #[arg(long, value_enum)]
    pub engine: Option<EngineChoice>,

    /// Continue without glyphs for relationships that cannot be resolved
    #[arg(long)]
    pub degraded: bool,

    /// Time budget for each external render
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a model document and report every problem found
    Validate {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Convert a model to its property-graph schema
    Schema {
        #[command(flatten)]
        io: IoArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = SchemaFormat::Json)]
        format: SchemaFormat,
    },

    /// Emit the UML class diagram
    Uml {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Emit the property-graph diagram
    Graph {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Diagram language; the graphviz engine always uses dot
        #[arg(long, value_enum, default_value_t = DiagramFormat::Plantuml)]
        format: DiagramFormat,
    },

    /// Emit SQL DDL for a table-per-concrete-class mapping
    Sql {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Emit markdown O/R mapping tables
    Orm {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Export the model as XMI 2.1
    Xmi {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Emit an example instance graph as a PlantUML object diagram
    Instances {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Use this instance document instead of generating one
        #[arg(long)]
        graph: Option<PathBuf>,

        /// Write the instance graph as YAML instead of a diagram
        #[arg(long, conflicts_with = "render")]
        yaml: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Text,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum DiagramFormat {
    Plantuml,
    Dot,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum EngineChoice {
    Plantuml,
    Graphviz,
}

impl From<EngineChoice> for LayoutEngine {
    fn from(value: EngineChoice) -> Self {
        match value {
            EngineChoice::Plantuml => LayoutEngine::PlantUml,
            EngineChoice::Graphviz => LayoutEngine::Graphviz,
        }
    }
}

/// Settings loaded from `--config`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub emitter: EmitterConfig,
    pub pipeline: PipelineOptions,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("in config file '{}'", path.display()))
    }

    /// Pipeline options with command-line overrides applied
    pub fn pipeline_options(&self, render: &RenderArgs) -> PipelineOptions {
        let mut options = self.pipeline.clone();
        options.degraded |= render.degraded;
        if let Some(engine) = render.engine {
            options.engine = engine.into();
        }
        if let Some(timeout_ms) = render.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        if render.text_only {
            options.render_final = false;
        }
        options
    }
}

/// Main CLI application
pub struct ModelgraphApp {
    config: AppConfig,
    color: bool,
}

impl ModelgraphApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application instance with loaded settings
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            color: false,
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag defaults
        let log_level = std::env::var("MODELGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format = std::env::var("MODELGRAPH_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());
        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            debug!(error = %e, "Logging already initialized");
        }

        self.color = cli.color.enabled();
        if let Some(path) = &cli.config {
            self.config = AppConfig::load(path)?;
        }

        if cli.verbose {
            eprintln!("Modelgraph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Validate { io } => self.validate_command(&io, cli.verbose),
            Commands::Schema { io, format } => self.schema_command(&io, format),
            Commands::Uml { io, render } => self.uml_command(&io, &render),
            Commands::Graph { io, render, format } => self.graph_command(&io, &render, format),
            Commands::Sql { io } => {
                let model = self.load_model(&io)?;
                self.write_output(io.output.as_deref(), &ddl(&model))
            }
            Commands::Orm { io } => {
                let model = self.load_model(&io)?;
                self.write_output(io.output.as_deref(), &orm_tables(&model))
            }
            Commands::Xmi { io } => {
                let model = self.load_model(&io)?;
                self.write_output(io.output.as_deref(), &export_xmi(&model)?)
            }
            Commands::Instances {
                io,
                render,
                graph,
                yaml,
            } => self.instances_command(&io, &render, graph.as_deref(), yaml),
        }
    }

    fn warn(&self, message: &str) {
        colorizer::warn(message, self.color);
    }

    /// Handle the validate command
    fn validate_command(&self, io: &IoArgs, verbose: bool) -> Result<()> {
        let (content, json) = self.read_input(io.input.as_deref())?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document = if json {
            ModelDocument::from_json_str(&content)?
        } else {
            ModelDocument::from_yaml_str(&content)?
        };

        match document.into_model_all() {
            Ok(model) => {
                let conversion = convert(&model);
                self.report_warnings(&conversion);
                println!(
                    "{}",
                    diagnostic(
                        Severity::Success,
                        &format!(
                            "Valid model '{}': {} classes, {} associations, {} generalizations",
                            model.name(),
                            model.class_count(),
                            model.associations().len(),
                            model.generalizations().len()
                        ),
                        self.color
                    )
                );
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    eprintln!("{}", diagnostic(Severity::Error, &error.to_string(), self.color));
                }
                Err(anyhow!("model has {} validation error(s)", errors.len()))
            }
        }
    }

    /// Handle the schema command
    fn schema_command(&self, io: &IoArgs, format: SchemaFormat) -> Result<()> {
        let conversion = self.convert(io)?;
        let text = match format {
            SchemaFormat::Json => serde_json::to_string_pretty(&conversion.schema)?,
            SchemaFormat::Text => schema_text(&conversion),
        };
        self.write_output(io.output.as_deref(), &text)
    }

    /// Handle the uml command
    fn uml_command(&self, io: &IoArgs, render: &RenderArgs) -> Result<()> {
        let model = self.load_model(io)?;
        let options = self.config.pipeline_options(render);
        if render.render && options.engine == LayoutEngine::Graphviz {
            bail!("the graphviz engine only renders the graph diagram");
        }
        let emitter = UmlEmitter::with_config(self.config.emitter.clone());
        let text = self.emit_or_render(&emitter, &model, render, options)?;
        self.write_output(io.output.as_deref(), &text)
    }

    /// Handle the graph command
    fn graph_command(&self, io: &IoArgs, render: &RenderArgs, format: DiagramFormat) -> Result<()> {
        let conversion = self.convert(io)?;
        let options = self.config.pipeline_options(render);
        let config = self.config.emitter.clone();

        let use_dot = format == DiagramFormat::Dot
            || (render.render && options.engine == LayoutEngine::Graphviz);
        if use_dot && render.render && options.engine == LayoutEngine::PlantUml {
            bail!("dot output needs --engine graphviz when rendering");
        }

        let text = if use_dot {
            self.emit_or_render(&DotEmitter::with_config(config), &conversion.schema, render, options)?
        } else {
            self.emit_or_render(&GraphEmitter::with_config(config), &conversion.schema, render, options)?
        };
        self.write_output(io.output.as_deref(), &text)
    }

    /// Handle the instances command
    fn instances_command(
        &self,
        io: &IoArgs,
        render: &RenderArgs,
        graph: Option<&Path>,
        yaml: bool,
    ) -> Result<()> {
        let instances = match graph {
            Some(path) => {
                let (content, json) = self.read_input(Some(path))?;
                if json {
                    InstanceGraph::from_json_str(&content)?
                } else {
                    InstanceGraph::from_yaml_str(&content)?
                }
            }
            None => generate_instances(&self.convert(io)?.schema),
        };
        info!(
            instances = instances.nodes.len(),
            edges = instances.edges.len(),
            "Instance graph ready"
        );

        if yaml {
            let text = serde_yaml::to_string(&instances)?;
            return self.write_output(io.output.as_deref(), &text);
        }

        let options = self.config.pipeline_options(render);
        if render.render && options.engine == LayoutEngine::Graphviz {
            bail!("the graphviz engine only renders the graph diagram");
        }
        let emitter = InstanceEmitter::with_config(self.config.emitter.clone());
        let text = self.emit_or_render(&emitter, &instances, render, options)?;
        self.write_output(io.output.as_deref(), &text)
    }

    /// Pass-one text, or the result of the full two-pass pipeline with `--render`
    fn emit_or_render<S, E>(
        &self,
        emitter: &E,
        source: &S,
        render: &RenderArgs,
        options: PipelineOptions,
    ) -> Result<String>
    where
        S: DiagramSource + ?Sized,
        E: Emitter<S>,
    {
        if !render.render {
            return Ok(emitter.emit(source, &DirectionMap::new())?);
        }

        let pipeline = Pipeline::for_engine(options);
        debug!(pipeline = ?pipeline, "Running two-pass pipeline");
        let output = pipeline
            .run(emitter, source)
            .with_context(|| format!("{} pipeline failed", emitter.name()))?;
        self.report_degraded(&output);

        Ok(match output.artifact {
            Some(artifact) => artifact,
            None => output.final_text,
        })
    }

    fn report_warnings(&self, conversion: &Conversion) {
        for warning in &conversion.warnings {
            self.warn(&warning.to_string());
        }
    }

    fn report_degraded(&self, output: &PipelineOutput) {
        if !output.missing_nodes.is_empty() {
            self.warn(&format!(
                "layout has no element for: {}",
                output.missing_nodes.join(", ")
            ));
        }
        for key in &output.unresolved {
            self.warn(&format!("no direction resolved for {}", key));
        }
    }

    fn load_model(&self, io: &IoArgs) -> Result<DomainModel> {
        let (content, json) = self.read_input(io.input.as_deref())?;
        let model = if json {
            DomainModel::from_json_str(&content)?
        } else {
            DomainModel::from_yaml_str(&content)?
        };
        debug!(model = model.name(), classes = model.class_count(), "Model loaded");
        Ok(model)
    }

    fn convert(&self, io: &IoArgs) -> Result<Conversion> {
        let model = self.load_model(io)?;
        let conversion = convert(&model);
        self.report_warnings(&conversion);
        Ok(conversion)
    }

    /// Read input from file or stdin; the flag tells whether it is JSON
    pub fn read_input(&self, input: Option<&Path>) -> Result<(String, bool)> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => {
                let content = fs::read_to_string(path).map_err(|e| {
                    anyhow!("Failed to read input file '{}': {}", path.display(), e)
                })?;
                let json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                Ok((content, json))
            }
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                let json = content.trim_start().starts_with('{');
                Ok((content, json))
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<&Path>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ModelgraphApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable schema listing
fn schema_text(conversion: &Conversion) -> String {
    let schema = &conversion.schema;
    let mut lines = vec![format!("Schema: {}", schema.name), String::new()];

    lines.push(format!("Nodes ({}):", schema.node_count()));
    for node in schema.nodes.values() {
        lines.push(format!("  {}", node.name));
        for (name, ty) in &node.attributes {
            lines.push(format!("    {}: {}", name, ty));
        }
    }

    lines.push(String::new());
    lines.push(format!("Relationships ({}):", schema.relationship_count()));
    for relationship in &schema.relationships {
        lines.push(format!(
            "  ({})-[:{}]->({})",
            relationship.from_node, relationship.type_name, relationship.to_node
        ));
    }

    if !schema.enumerations.is_empty() {
        lines.push(String::new());
        lines.push(format!("Enumerations ({}):", schema.enumerations.len()));
        for enumeration in &schema.enumerations {
            lines.push(format!(
                "  {}: {}",
                enumeration.name,
                enumeration.values.join(", ")
            ));
        }
    }

    if !conversion.warnings.is_empty() {
        lines.push(String::new());
        lines.push(format!("Warnings ({}):", conversion.warnings.len()));
        for warning in &conversion.warnings {
            lines.push(format!("  {}", warning));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
