use docket::app::App;
use docket::config;
use docket::endpoints::Endpoints;
use docket::logging;
use docket::ui::run_ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    config::initialize_config()?;
    let cfg = config::get_config();

    // Keep the handle alive so records keep flushing until exit.
    let _logger = logging::init_logging(&cfg.log_level)?;
    log::info!("docket starting for case {}", cfg.case_id);

    let endpoints = Endpoints::from_config(&cfg)?;
    let app = App::new(endpoints, cfg.case_id.clone());

    run_ui(app).await?;

    log::info!("docket shut down");
    Ok(())
}
