use flexi_logger::Logger;

mod command;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    command::run()
}
