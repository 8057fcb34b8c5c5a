//! Print a single attribute

use crate::util::{self, Paths};
use anyhow::Result;

pub fn run(paths: &Paths, name: &str) -> Result<()> {
    let attr = util::find_attribute(name)?;
    let state = paths.open_state()?;

    println!("{}", state.get_json(attr));
    Ok(())
}
