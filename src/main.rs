mod cli;
mod errors;
mod extract;
mod sql;

use std::io::{self, Read};

use errors::Error;

fn main() -> Result<(), Error> {
    let config = cli::parse_args();
    cli::init_logger(config.level)?;

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let results = extract::run(&input);
    println!("{}", extract::to_json(&results)?);

    Ok(())
}
