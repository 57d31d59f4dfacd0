use std::{env, path::PathBuf, process::ExitCode};

mod app;
mod audio;
mod config;
mod library;
mod logging;
mod player;
mod playlist;
mod runtime;
mod ui;

const USAGE: &str = "\
usage: cadence [--print-config] [PATH...]

  PATH             audio files or folders to load into the playlist
  --print-config   print the effective configuration as TOML and exit
  -h, --help       show this help";

fn main() -> ExitCode {
    let mut paths: Vec<PathBuf> = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            "--print-config" => {
                let settings = runtime::load_settings();
                return match settings.to_toml() {
                    Ok(text) => {
                        print!("{text}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("cadence: failed to render config: {e}");
                        ExitCode::FAILURE
                    }
                };
            }
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    match runtime::run(paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cadence: {e}");
            ExitCode::FAILURE
        }
    }
}
