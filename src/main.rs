//! Main entry point for the jvmch CLI app

fn main() -> std::process::ExitCode {
    jvmch::cli_runner::run_cli_app()
}
