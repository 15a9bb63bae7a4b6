//! CLI tool for xlplan - lays out a decoded sheet and outputs its paint plan
//!
//! Usage:
//!   xlplan_cli <sheet.json>                         # Plan JSON to stdout
//!   xlplan_cli <sheet.json> -o plan.json            # Plan JSON to file
//!   xlplan_cli <sheet.json> --paginate              # Split rows across pages
//!   xlplan_cli <sheet.json> --config layout.json    # Partial LayoutConfig

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use xlplan::error::XlplanError;
use xlplan::{convert, LayoutConfig, RenderContext, SheetData};

const USAGE: &str =
    "Usage: xlplan_cli <sheet.json> [-o plan.json] [--paginate] [--config layout.json]";

struct Args {
    input: String,
    output: Option<String>,
    paginate: bool,
    config: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut paginate = false;
    let mut config = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                output = Some(iter.next().ok_or("-o requires a path")?.clone());
            }
            "--config" => {
                config = Some(iter.next().ok_or("--config requires a path")?.clone());
            }
            "--paginate" => paginate = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            path if input.is_none() => input = Some(path.to_string()),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    Ok(Args {
        input: input.ok_or("missing input file")?,
        output,
        paginate,
        config,
    })
}

fn load_config(args: &Args) -> Result<LayoutConfig, XlplanError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str(&json)
                .map_err(|e| XlplanError::upstream(format!("layout config {path}"), e))?
        }
        None => LayoutConfig::default(),
    };
    if args.paginate {
        config.enable_pagination = true;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<String, XlplanError> {
    let config = load_config(args)?;

    let json = fs::read_to_string(&args.input)?;
    let sheet: SheetData = serde_json::from_str(&json)
        .map_err(|e| XlplanError::upstream(format!("sheet {}", args.input), e))?;

    let plan = convert(&sheet, &config, &mut RenderContext::new())?;
    eprintln!(
        "Planned {} page(s), {} commands, {:.2}x{:.2}pt",
        plan.page_count(),
        plan.commands.len(),
        plan.page_width,
        plan.page_height
    );
    Ok(serde_json::to_string_pretty(&plan)?)
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let json = match run(&args) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
