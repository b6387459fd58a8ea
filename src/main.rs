use clap::Parser;
use eventtrader::cli::{Cli, run};
use eventtrader::obs::init_tracing;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli.log_level) {
        eprintln!("error: {err}");
        return std::process::ExitCode::from(2);
    }
    run(cli)
}
