use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use stix_dispatcher::config::{load_reference_registry, ConfigError, MappingConfig};
use stix_dispatcher::statement::build_select;
use stix_dispatcher::{Expression, PatternTranslator, TranslatorOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FIELD_MAP_FILE: &str = "stix_field_map.json";
const OPERATOR_MAP_FILE: &str = "operators.json";
const REFERENCE_TYPES_FILE: &str = "reference_types.json";
const TABLE: &str = "events";

/// 创建翻译器实例，优先使用JSON配置，失败时使用默认配置
fn create_translator() -> PatternTranslator<MappingConfig> {
    let mapping = match MappingConfig::from_json_files(FIELD_MAP_FILE, OPERATOR_MAP_FILE) {
        Ok(mapping) => {
            info!("loaded {} object mappings from {}", mapping.fields.len(), FIELD_MAP_FILE);
            mapping
        }
        Err(e) => {
            warn!("{}, falling back to the sample mapping", e);
            MappingConfig::sample()
        }
    };

    let mut options = TranslatorOptions::default();
    match load_reference_registry(REFERENCE_TYPES_FILE) {
        Ok(registry) => options.references = registry,
        Err(ConfigError::Missing(_)) => {}
        Err(e) => warn!("{}, using the default reference types", e),
    }

    PatternTranslator::with_options(mapping, options)
}

/// 翻译一个JSON格式的模式并打印结果
fn run_pattern(translator: &PatternTranslator<MappingConfig>, input: &str) -> anyhow::Result<()> {
    let pattern: Expression = serde_json::from_str(input).context("无法解析模式JSON")?;
    let predicate = translator.translate(&pattern)?;

    match build_select(TABLE, &predicate) {
        Some(sql) => {
            println!("[查询条件]: {}", predicate);
            println!("[生成的 SQL]: {}", sql);
        }
        None => println!("⚠️ 模式中没有适用于该数据源的条件"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let translator = create_translator();

    // 给定文件时只翻译一次
    if let Some(path) = std::env::args().nth(1) {
        let input = std::fs::read_to_string(&path).with_context(|| format!("无法读取文件 {}", path))?;
        return run_pattern(&translator, &input);
    }

    println!("--- STIX Dispatcher: 模式到 SQL 翻译器 ---");
    println!("每行输入一个JSON格式的模式, 输入 :quit 退出");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("stix> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == ":quit" {
                    break;
                }
                editor.add_history_entry(line)?;
                if let Err(e) = run_pattern(&translator, line) {
                    println!("✗ 翻译失败: {:#}", e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
