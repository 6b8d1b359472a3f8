use color_eyre::eyre::Result;
use simple_logger::SimpleLogger;

mod keymap;
mod options;
mod run;

use options::Options;

fn main() -> Result<()> {
    color_eyre::install()?;
    let options = Options::parse(std::env::args().skip(1))?;
    SimpleLogger::new().with_level(options.log_level).init()?;

    run::run(options)
}
