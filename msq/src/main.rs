mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Mode};
use songsearch::{
    CompileOptions, CompiledPredicate, SearchPlan, compile_query, fallback_predicate, parse_query,
    plan_search,
};
use std::io::Write;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.compile_options();
    if let Some(query) = &cli.query {
        return run(query, &cli, &options);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("stdout is closed")?;
        let mut line = String::new();
        if stdin.read_line(&mut line).context("stdin is closed")? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        } else if line == "/bye" {
            break;
        }

        if let Err(e) = run(line, &cli, &options) {
            eprintln!("Failed to run query: {e:?}");
        }
    }
    Ok(())
}

fn run(query: &str, cli: &Cli, options: &CompileOptions) -> Result<()> {
    match cli.mode {
        Mode::Ast => {
            let expr = parse_query(query).map_err(|e| {
                let column = query.get(..e.position()).map_or(0, |head| head.chars().count());
                anyhow!("{e}\n  {query}\n  {}^", " ".repeat(column))
            })?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&expr)?);
            } else {
                println!("{expr:#?}");
            }
        }
        Mode::Compile => {
            let predicate = compile_query(query, options).unwrap_or_else(|error| {
                warn!(%error, "query fell back to free text");
                fallback_predicate(query, options)
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&predicate)?);
            } else {
                print_predicate(&predicate);
            }
        }
        Mode::Plan => {
            let plan = plan_search(query, options);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan).context("failed to render plan")?;
            }
        }
    }
    Ok(())
}

fn print_predicate(predicate: &CompiledPredicate) {
    println!("{}", predicate.sql);
    for (i, param) in predicate.params.iter().enumerate() {
        println!("[{}] {param}", i + 1);
    }
}

fn print_plan(plan: &SearchPlan) -> Result<()> {
    let semantic = &plan.semantic;
    for prompt in &semantic.positive_prompts {
        println!("+ {prompt}");
    }
    for prompt in &semantic.negative_prompts {
        println!("- {prompt}");
    }
    for subquery in &semantic.subqueries {
        println!("~ {}", serde_json::to_string(subquery)?);
    }
    if semantic.has_semantic {
        println!("--");
    }
    print_predicate(&plan.predicate);
    Ok(())
}
