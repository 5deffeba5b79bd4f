use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match roster_backend::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            eprintln!("roster_backend: {}", e);
            ExitCode::FAILURE
        }
    }
}
