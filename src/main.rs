use instagrid::config::DemoConfig;
use instagrid::error::InstagridError;

fn main() -> Result<(), InstagridError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DemoConfig::from_env()?;
    pollster::block_on(instagrid::app::run(config))
}
