use std::{error::Error, process::ExitCode};

const USAGE: &str = "\
Usage: favicon-converter [-v] <input_favicon> [output_directory]

Example:
  favicon-converter favicon.ico
  favicon-converter favicon.png ./output";

fn main() -> ExitCode {
    let mut args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().is_some_and(|arg| arg == "-v") {
        args.remove(0);
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    let Some(input) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let output_dir = args.get(1).map_or(".", String::as_str);

    match favicon_converter::convert(input, output_dir) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let mut message = format!("✗ Error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {cause}"));
                source = cause.source();
            }
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
