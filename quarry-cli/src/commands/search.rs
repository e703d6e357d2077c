use anyhow::{Context, Result};
use clap::Args;
use quarry::config::default_connection_name;
use quarry::{Config, IndexModel, Model, Params, SearchBuilder, SortOrder};
use serde_json::Value;
use std::path::Path;

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Index to search
    #[arg(short, long)]
    pub index: String,

    /// Named connection from the config file
    #[arg(long, env = "QUARRY_CONNECTION")]
    pub connection: Option<String>,

    /// Match every document
    #[arg(long)]
    pub match_all: bool,

    /// Exact term, as field=value (repeatable)
    #[arg(long, value_name = "FIELD=VALUE")]
    pub term: Vec<String>,

    /// Full-text match, as field=text (repeatable)
    #[arg(long = "match", value_name = "FIELD=TEXT")]
    pub matches: Vec<String>,

    /// Inclusive range, as field=gte..lte (repeatable)
    #[arg(long, value_name = "FIELD=GTE..LTE")]
    pub range: Vec<String>,

    /// Term placed inside a `must` boolean clause (repeatable)
    #[arg(long, value_name = "FIELD=VALUE")]
    pub must_term: Vec<String>,

    /// Terms aggregation, as name=field (repeatable)
    #[arg(long, value_name = "NAME=FIELD")]
    pub terms_agg: Vec<String>,

    /// Sort, as field or field:asc|desc (repeatable)
    #[arg(long, value_name = "FIELD[:ORDER]")]
    pub sort: Vec<String>,

    /// Fields to return from `_source`
    #[arg(long, value_delimiter = ',')]
    pub source: Vec<String>,

    /// Page size
    #[arg(long)]
    pub size: Option<usize>,

    /// Return no hits, only aggregations
    #[arg(long, conflicts_with = "size")]
    pub size_less: bool,

    /// Offset of the first hit
    #[arg(long)]
    pub from: Option<usize>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub debug: bool,

    /// Print only the total hit count
    #[arg(long)]
    pub total: bool,

    /// Print a dotted path plucked from every hit's `_source`
    #[arg(long)]
    pub pluck: Option<String>,

    /// Print reshaped buckets of these aggregations
    #[arg(long, value_delimiter = ',')]
    pub aggregations: Vec<String>,
}

/// Build the search described by `args`, then print its body or its result
pub async fn run_search(config_path: &Path, args: &SearchArgs) -> Result<()> {
    let config = Config::load_from(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let connection = args
        .connection
        .clone()
        .unwrap_or_else(default_connection_name);
    let connection_config = config.connection(&connection)?;

    let model = IndexModel::new(&args.index)
        .with_connection(connection.as_str())
        .with_config(connection_config);

    let mut q = model.query();
    apply(args, &mut q)?;

    if args.debug {
        println!("{}", serde_json::to_string_pretty(&q.debug())?);
        return Ok(());
    }

    tracing::info!(index = %args.index, connection = %connection, "running search");
    let result = q.get().await?;

    let output = if args.total {
        Value::from(result.total()?)
    } else if let Some(path) = &args.pluck {
        result.pluck(path)?.into_value()
    } else if !args.aggregations.is_empty() {
        let names: Vec<&str> = args.aggregations.iter().map(String::as_str).collect();
        result.aggregations(&names)?.into_value()
    } else {
        result.into_value()
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Translate flags into builder calls
pub fn apply(args: &SearchArgs, q: &mut SearchBuilder<'_>) -> Result<()> {
    if args.match_all {
        q.match_all();
    }

    for raw in &args.term {
        let (field, value) = split_pair(raw, "=")?;
        q.term(field, scalar(value));
    }

    for raw in &args.matches {
        let (field, text) = split_pair(raw, "=")?;
        q.match_query(field, text);
    }

    for raw in &args.range {
        let (field, bounds) = split_pair(raw, "=")?;
        let (gte, lte) = split_pair(bounds, "..")
            .with_context(|| format!("Range '{}' must look like field=gte..lte", raw))?;
        q.range(field, scalar(gte), scalar(lte));
    }

    if !args.must_term.is_empty() {
        let terms = args
            .must_term
            .iter()
            .map(|raw| split_pair(raw, "="))
            .collect::<Result<Vec<_>>>()?;
        q.must(|m| {
            for (field, value) in &terms {
                m.term(*field, scalar(value));
            }
        });
    }

    for raw in &args.terms_agg {
        let (name, field) = split_pair(raw, "=")?;
        q.terms_aggregation(name, Some(field), Params::new(), None);
    }

    for raw in &args.sort {
        let (field, order) = match raw.split_once(':') {
            Some((field, order)) => {
                let order: SortOrder = order.parse().map_err(anyhow::Error::msg)?;
                (field, Some(order))
            }
            None => (raw.as_str(), None),
        };
        q.sort(field, order);
    }

    if !args.source.is_empty() {
        q.source(args.source.iter().cloned());
    }

    if args.size_less {
        q.size_less();
    } else if let Some(size) = args.size {
        q.size(size);
    }

    if let Some(from) = args.from {
        q.from(from);
    }

    Ok(())
}

fn split_pair<'a>(raw: &'a str, separator: &str) -> Result<(&'a str, &'a str)> {
    match raw.split_once(separator) {
        Some((left, right)) if !left.is_empty() => Ok((left, right)),
        _ => anyhow::bail!("Expected '{}' in '{}'", separator, raw),
    }
}

/// Numbers and booleans keep their JSON type; everything else is a string
fn scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SearchArgs,
    }

    fn body(argv: &[&str]) -> Value {
        let cli = TestCli::parse_from(std::iter::once("quarry").chain(argv.iter().copied()));
        let model = IndexModel::new(cli.args.index.clone());
        let mut q = model.query();
        apply(&cli.args, &mut q).unwrap();
        q.debug()
    }

    #[test]
    fn test_match_all_with_paging() {
        assert_eq!(
            body(&["-i", "docs", "--match-all", "--size", "5", "--from", "10"]),
            json!({"query": {"match_all": {}}, "size": 5, "from": 10})
        );
    }

    #[test]
    fn test_terms_and_must() {
        let body = body(&[
            "-i", "docs", "--term", "status=active", "--must-term", "year=2020",
        ]);
        assert_eq!(
            body["query"],
            json!({"bool": {"must": [
                {"bool": {"must": [{"term": {"year": 2020}}]}},
                {"term": {"status": "active"}}
            ]}})
        );
    }

    #[test]
    fn test_sort_source_and_aggregation() {
        let body = body(&[
            "-i", "docs", "--sort", "price:asc", "--sort", "created",
            "--source", "title,price", "--terms-agg", "colors=color", "--size-less",
        ]);
        assert_eq!(
            body["sort"],
            json!([{"price": {"order": "asc"}}, {"created": {"order": "desc"}}])
        );
        assert_eq!(body["_source"], json!(["title", "price"]));
        assert_eq!(body["aggregations"]["colors"]["terms"]["field"], json!("color"));
        assert_eq!(body["size"], json!(0));
    }

    #[test]
    fn test_range_bounds() {
        let body = body(&["-i", "docs", "--range", "price=10..20"]);
        assert_eq!(body["query"]["range"]["price"]["gte"], json!(10));
        assert_eq!(body["query"]["range"]["price"]["lte"], json!(20));
    }

    #[test]
    fn test_malformed_pairs() {
        assert!(split_pair("status", "=").is_err());
        assert!(split_pair("=active", "=").is_err());
        assert_eq!(split_pair("a=b=c", "=").unwrap(), ("a", "b=c"));
        assert_eq!(scalar("true"), json!(true));
        assert_eq!(scalar("red"), json!("red"));
    }
}
