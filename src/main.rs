//! # Fax page tool
#![warn(missing_docs)]

mod cli;

use cli::opt::{Command, Options};
use color_eyre::eyre;

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;
    match opt.command {
        Command::Encode(opts) => cli::encode(opts),
        Command::Decode(opts) => cli::decode(opts),
        Command::Show(opts) => cli::show(opts),
    }
}
