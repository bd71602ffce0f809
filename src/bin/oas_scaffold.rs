use std::process::ExitCode;

fn main() -> ExitCode {
    match oas_scaffold::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
