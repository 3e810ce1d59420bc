use std::env;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use stocksieve::analyze::Analyzer;
use stocksieve::error::{Result, StocksieveError};
use stocksieve::project::Project;
use stocksieve::stock::Stock;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let arguments: Vec<String> = env::args().skip(1).collect();
    let (project_path, stock_path) = match (arguments.first(), arguments.get(1)) {
        (Some(project), Some(stock)) => (project, stock),
        _ => {
            eprintln!("usage: stocksieve <project.yml> <stock.csv> [upgrade [option]]");
            return Ok(());
        }
    };
    let project = Project::load(Path::new(project_path))?;
    let stock = Stock::from_delimited(Path::new(stock_path), ',')?;
    let mut analyzer = Analyzer::new(&project, &stock);

    match parse_index(arguments.get(2), "upgrade")? {
        Some(upgrade_num) => {
            let option_num = parse_index(arguments.get(3), "option")?;
            print!("{}", analyzer.detailed_report(upgrade_num, option_num)?);
        }
        None => {
            println!("upgrade | option_num | option | applicable_to | applicable_percent");
            for record in analyzer.report()? {
                println!(
                    "{} '{}' | {} | {} | {} | {:.1}%",
                    record.upgrade,
                    record.upgrade_name,
                    record.option_num,
                    record.option,
                    record.applicable_to,
                    record.applicable_percent
                );
            }
        }
    }
    Ok(())
}

fn parse_index(argument: Option<&String>, what: &str) -> Result<Option<usize>> {
    argument
        .map(|value| {
            value.parse::<usize>().map_err(|_| {
                StocksieveError::Configuration(format!("{what} argument {value} is not a number"))
            })
        })
        .transpose()
}
