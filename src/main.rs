use modbatch::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is initialized by the app once the verbosity flag is known
    let app = CliApp::new();
    app.run().await
}
