//! # 组件发现命令行工具
//!
//! 读取 JSON 索引文档，对一个部署单元执行组件发现，输出注册的组件和依赖边

use anyhow::{anyhow, Context};
use clap::Parser;
use deployment_common::{CompositionError, DeploymentType, ListenerAttributes, ModuleDescription};
use deployment_composition::{
    failure_summary, load_index, DiscoveryBuilder, DiscoveryRuntime, LoggingConfig,
    PipelineReport, DEFAULT_ENV_PREFIX,
};
use discovery_abstractions::{DeploymentUnit, DiscoveryOutcome};
use discovery_impl::DependencyGraph;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "discovery-cli")]
#[command(about = "对部署单元执行注解驱动的组件发现")]
struct Args {
    /// 索引文档路径，可重复
    #[arg(short, long = "index", required_unless_present = "listener_attributes")]
    indexes: Vec<PathBuf>,

    /// 部署单元名称
    #[arg(short, long, default_value = "deployment.war")]
    unit: String,

    /// 父部署单元名称
    #[arg(long)]
    parent: Option<String>,

    /// 部署单元类型，默认根据名称推断
    #[arg(short = 't', long = "type")]
    deployment_type: Option<DeploymentType>,

    /// 模块名称，默认为部署单元名称去掉扩展名
    #[arg(long)]
    module: Option<String>,

    /// 配置文件路径（.toml 或 .json）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志过滤表达式，优先于 RUST_LOG 和配置文件中的 logging.level
    #[arg(long)]
    log_level: Option<String>,

    /// 以 JSON 格式输出
    #[arg(long)]
    json: bool,

    /// 输出监听器属性定义后退出
    #[arg(long)]
    listener_attributes: bool,
}

/// JSON 输出
#[derive(Serialize)]
struct Output<'a> {
    unit: &'a str,
    module: &'a str,
    report: &'a PipelineReport,
    graph: &'a DependencyGraph,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let runtime = build_runtime(&args)?;

    if args.listener_attributes {
        print_listener_attributes(runtime.listener_attributes(), args.json)?;
        return Ok(());
    }

    info!("加载 {} 个索引文档", args.indexes.len());
    let index = load_index(&args.indexes).await?;

    let module_name = args.module.clone().unwrap_or_else(|| module_name(&args.unit));
    let module = Arc::new(ModuleDescription::new(module_name));
    let deployment_type = args
        .deployment_type
        .unwrap_or_else(|| DeploymentType::from_archive_name(&args.unit));
    let mut unit = DeploymentUnit::new(args.unit.clone(), deployment_type)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(&module));
    if let Some(parent) = &args.parent {
        unit = unit.with_parent(parent.clone());
    }

    let report = match runtime.pipeline().deploy(&unit) {
        Ok(report) => report,
        Err(CompositionError::Deployment { source }) => {
            return Err(anyhow!(failure_summary(&source)));
        }
        Err(e) => return Err(e.into()),
    };

    let graph = DependencyGraph::from_module(&module);
    if args.json {
        let output = Output {
            unit: unit.name(),
            module: module.module_name(),
            report: &report,
            graph: &graph,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&unit, &report, &graph);
    }
    Ok(())
}

/// 根据命令行参数构建运行时
fn build_runtime(args: &Args) -> anyhow::Result<DiscoveryRuntime> {
    let mut builder = DiscoveryBuilder::new().add_config_env_vars(DEFAULT_ENV_PREFIX);
    if let Some(config) = &args.config {
        builder = builder
            .add_config_path(config)
            .with_context(|| format!("无法使用配置文件 {}", config.display()))?;
    }

    // 日志输出到标准错误，标准输出留给结果
    let logging = LoggingConfig::default().with_stderr();
    let env_filter = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    builder = match explicit_log_filter(args.log_level.as_deref(), env_filter) {
        Some(filter) => builder.with_logging(LoggingConfig { filter, ..logging }),
        None => builder.with_logging_from_settings(logging),
    };
    Ok(builder.build()?)
}

/// 命令行或环境变量中显式指定的日志过滤表达式
fn explicit_log_filter(cli: Option<&str>, env: Option<String>) -> Option<String> {
    cli.map(str::to_string)
        .or(env)
        .filter(|filter| !filter.trim().is_empty())
}

fn module_name(unit: &str) -> String {
    match unit.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => unit.to_string(),
    }
}

fn print_text(unit: &DeploymentUnit, report: &PipelineReport, graph: &DependencyGraph) {
    for stage in &report.stages {
        match &stage.outcome {
            DiscoveryOutcome::Skipped { reason } => {
                println!("{}: 跳过 {} ({})", stage.processor, unit, reason);
            }
            DiscoveryOutcome::Completed { report } => {
                println!(
                    "{}: {} 出现 {} 次, 忽略 {} 次, 拒绝 {} 次, 处理 {} 次",
                    stage.processor,
                    unit,
                    report.occurrences,
                    report.ignored_targets,
                    report.rejected,
                    report.handled
                );
            }
        }
    }

    println!("模块 {}: {} 个组件", graph.module_name(), graph.len());
    for component in graph.components() {
        println!("  {} [{}] {}", component.name, component.kind, component.class_name);
        for edge in &component.dependencies {
            println!("    -> {} ({})", edge.target, edge.dependency_type);
        }
    }
}

fn print_listener_attributes(attributes: &ListenerAttributes, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(attributes)?);
        return Ok(());
    }

    for definition in attributes.iter() {
        let default = definition
            .default_value
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        println!(
            "{:<32} {:<8} 默认值 {}",
            definition.name,
            format!("{:?}", definition.value_type).to_lowercase(),
            default
        );
    }
    Ok(())
}
