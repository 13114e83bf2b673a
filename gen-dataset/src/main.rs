use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::process::exit;
use std::{env, fs};

use clap::Parser;
use console::style;

use gen_dataset::log::{LogExt, StdLog};
use gen_dataset::{generate, Config, DatasetConfig, Error};

/// Makes `dir` the current working directory, creating it first if it doesn't exist.
fn enter_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|e| Error::io("Failed to create directory", dir, e))?;
    env::set_current_dir(dir).map_err(|e| Error::io("Failed to change directory to", dir, e))
}

/// Returns true if the user agreed.
fn is_yes(answer: &str) -> bool {
    answer.starts_with(['y', 'Y'])
}

/// Shows what is going to be created and asks the user to confirm.
fn confirm(config: &DatasetConfig, cwd: &Path) -> Result<bool, Error> {
    print!(
        "Create {} directories and {} files in {}? [y/N] ",
        config.dir_count(),
        config.count,
        cwd.display()
    );
    stdout()
        .flush()
        .map_err(|e| format!("Failed to write to standard output: {e}"))?;
    let mut answer = String::new();
    stdin()
        .read_line(&mut answer)
        .map_err(|e| format!("Failed to read the answer: {e}"))?;
    Ok(is_yes(&answer))
}

fn main() {
    let config: Config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("{} {}", style("error:").for_stderr().bold().red(), e);
        exit(1);
    }

    let mut log = StdLog::new();
    log.quiet = config.quiet;

    if let Some(dir) = &config.dir {
        if let Err(e) = enter_dir(dir) {
            log.err(e);
            exit(1);
        }
    }

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            log.err(format!("Cannot determine current working directory: {e}"));
            exit(1);
        }
    };

    let dataset = config.dataset();
    if !config.yes {
        match confirm(&dataset, &cwd) {
            Ok(true) => {}
            Ok(false) => exit(0),
            Err(e) => {
                log.err(e);
                exit(1);
            }
        }
    }

    if let Err(e) = generate(&dataset, &cwd, &log) {
        log.err(e);
        exit(1);
    }
}
