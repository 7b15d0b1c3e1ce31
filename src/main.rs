use log::error;
use sf_crime_viz::config::PipelineConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = sf_crime_viz::run(&PipelineConfig::default()) {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
